use crate::error::Result;
use roxmltree::{Document, Node, ParsingOptions};

/// Tag of the repeated element that carries one statistic.
pub const ROW_TAG: &str = "row";

/// Element ECOS uses for its status/error payload.
const RESULT_TAG: &str = "RESULT";
const TOTAL_COUNT_TAG: &str = "list_total_count";

/// A single flattened `row` element.
///
/// Maps each direct child element's tag name to its text, in document order.
/// A child that is absent is simply not a key; a child with no text is a key
/// with `None`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RawRecord {
    fields: Vec<(String, Option<String>)>,
}

impl RawRecord {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a field. A repeated tag replaces the earlier value in place.
    pub fn insert(&mut self, name: impl Into<String>, text: Option<String>) {
        let name = name.into();
        match self.fields.iter_mut().find(|(k, _)| *k == name) {
            Some(slot) => slot.1 = text,
            None => self.fields.push((name, text)),
        }
    }

    pub fn contains_key(&self, name: &str) -> bool {
        self.fields.iter().any(|(k, _)| k == name)
    }

    /// Text of a field; `None` when the key is absent or has no text.
    pub fn get(&self, name: &str) -> Option<&str> {
        self.fields
            .iter()
            .find(|(k, _)| k == name)
            .and_then(|(_, v)| v.as_deref())
    }

    pub fn field_names(&self) -> impl Iterator<Item = &str> {
        self.fields.iter().map(|(k, _)| k.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, Option<&str>)> {
        self.fields.iter().map(|(k, v)| (k.as_str(), v.as_deref()))
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

impl<K: Into<String>> FromIterator<(K, Option<String>)> for RawRecord {
    fn from_iter<I: IntoIterator<Item = (K, Option<String>)>>(iter: I) -> Self {
        let mut record = RawRecord::new();
        for (k, v) in iter {
            record.insert(k, v);
        }
        record
    }
}

/// Status payload ECOS returns in place of data (bad key, no data, ...).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiNotice {
    pub code: String,
    pub message: String,
}

/// A parsed `KeyStatisticList` response body.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct KeyStatResponse {
    pub records: Vec<RawRecord>,
    /// Value of `list_total_count`, when present and numeric.
    pub total_count: Option<usize>,
    pub notice: Option<ApiNotice>,
}

impl KeyStatResponse {
    /// Parse a response body. Fails only if the body is not well-formed XML.
    pub fn parse(xml: &str) -> Result<KeyStatResponse> {
        let doc = parse_document(xml)?;
        let records = collect_rows(&doc);
        let total_count = first_element(&doc, TOTAL_COUNT_TAG)
            .and_then(element_text)
            .and_then(|t| t.trim().parse::<usize>().ok());
        let notice = first_element(&doc, RESULT_TAG).map(|n| ApiNotice {
            code: child_text(n, "CODE").unwrap_or_default(),
            message: child_text(n, "MESSAGE").unwrap_or_default(),
        });
        Ok(KeyStatResponse {
            records,
            total_count,
            notice,
        })
    }
}

/// Flatten every `row` element of an XML document, at any depth, into a
/// [`RawRecord`], in document order.
pub fn flatten_rows(xml: &str) -> Result<Vec<RawRecord>> {
    let doc = parse_document(xml)?;
    Ok(collect_rows(&doc))
}

/// Parse with `<!DOCTYPE>` declarations allowed.
fn parse_document(xml: &str) -> Result<Document<'_>> {
    let mut options = ParsingOptions::default();
    options.allow_dtd = true;
    Ok(Document::parse_with_options(xml, options)?)
}

fn collect_rows(doc: &Document) -> Vec<RawRecord> {
    doc.descendants()
        .filter(|n| n.has_tag_name(ROW_TAG))
        .map(|row| {
            row.children()
                .filter(|c| c.is_element())
                .map(|c| (c.tag_name().name(), element_text(c)))
                .collect::<RawRecord>()
        })
        .collect()
}

fn first_element<'a, 'input>(doc: &'a Document<'input>, tag: &str) -> Option<Node<'a, 'input>> {
    doc.descendants().find(|n| n.has_tag_name(tag))
}

fn child_text(node: Node, tag: &str) -> Option<String> {
    node.children()
        .find(|c| c.has_tag_name(tag))
        .and_then(element_text)
        .map(|t| t.trim().to_string())
}

/// Text of an element up to its first child element. Comments and
/// processing instructions in between are skipped, so `<A><!-- c -->5</A>`
/// reads as `5`. No text at all is `None`.
fn element_text(node: Node) -> Option<String> {
    let text: String = node
        .children()
        .take_while(|c| !c.is_element())
        .filter(|c| c.is_text())
        .filter_map(|c| c.text())
        .collect();
    if text.is_empty() {
        None
    } else {
        Some(text)
    }
}

/// Raw grid of one sheet as read from the uploaded file, header row
/// included.
#[derive(Debug, Clone)]
pub struct ParsedSheet {
    pub name: String,
    pub rows: Vec<Vec<String>>,
}

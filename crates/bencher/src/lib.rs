/// A raw request header block used as benchmark input.
#[derive(Debug, Copy, Clone)]
pub struct Fixture {
    name: &'static str,
    file_name: &'static str,
    content: &'static str,
}

impl Fixture {
    pub const fn new(name: &'static str, file_name: &'static str, content: &'static str) -> Self {
        Self { name, file_name, content }
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn file_name(&self) -> &'static str {
        self.file_name
    }

    pub fn content(&self) -> &'static str {
        self.content
    }

    /// Bytes after the request line, as handed to the header parser.
    pub fn header_block(&self) -> &'static [u8] {
        let content = self.content.as_bytes();
        content.windows(2).position(|w| w == b"\r\n").map_or(content, |pos| &content[pos + 2..])
    }

    /// Splits the content into pieces of at most `size` bytes, the way a slow
    /// peer would deliver them.
    pub fn fragments(&self, size: usize) -> Vec<&'static [u8]> {
        self.content.as_bytes().chunks(size.max(1)).collect()
    }
}

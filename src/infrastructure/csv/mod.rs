// ============================================================
// CSV TOOLING
// ============================================================
// Delimiter and encoding detection for uploaded CSV files

/// Stateless helpers shared by the CSV ingestion path.
pub struct CsvParser;

impl CsvParser {
    /// Decode raw upload bytes, falling back from UTF-8 to Windows-1252.
    pub fn decode_bytes(bytes: &[u8]) -> String {
        if let Ok(content) = std::str::from_utf8(bytes) {
            return content.to_string();
        }

        let (content, _, had_errors) = encoding_rs::WINDOWS_1252.decode(bytes);
        if !had_errors {
            return content.into_owned();
        }

        String::from_utf8_lossy(bytes).to_string()
    }

    /// Detect delimiter from content (comma, semicolon, tab, pipe)
    pub fn detect_delimiter(content: &str) -> u8 {
        let candidates = [b',', b';', b'\t', b'|'];

        let mut best_delimiter = b',';
        let mut best_score = 0.0f32;

        for &delimiter in &candidates {
            let sample_lines: Vec<_> = content.lines().take(10).collect();

            if sample_lines.is_empty() {
                continue;
            }

            let mut field_counts = Vec::new();

            for line in &sample_lines {
                let count = line.chars().filter(|&c| c as u8 == delimiter).count();
                field_counts.push(count);
            }

            // Score by consistency (low standard deviation) and frequency
            if !field_counts.is_empty() {
                let avg = field_counts.iter().sum::<usize>() as f32 / field_counts.len() as f32;
                let variance = field_counts
                    .iter()
                    .map(|&x| (x as f32 - avg).powi(2))
                    .sum::<f32>()
                    / field_counts.len() as f32;

                let score = avg / (1.0 + variance.sqrt());

                if score > best_score {
                    best_score = score;
                    best_delimiter = delimiter;
                }
            }
        }

        best_delimiter
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_detect_delimiter() {
        assert_eq!(CsvParser::detect_delimiter("a,b,c\nd,e,f"), b',');
        assert_eq!(CsvParser::detect_delimiter("a;b;c\nd;e;f"), b';');
        assert_eq!(CsvParser::detect_delimiter("a\tb\nc\td"), b'\t');
    }

    #[test]
    fn test_detect_delimiter_defaults_to_comma() {
        assert_eq!(CsvParser::detect_delimiter(""), b',');
        assert_eq!(CsvParser::detect_delimiter("singlefield"), b',');
    }

    #[test]
    fn test_decode_utf8() {
        assert_eq!(CsvParser::decode_bytes("Região,Total".as_bytes()), "Região,Total");
    }

    #[test]
    fn test_decode_windows_1252_fallback() {
        // "Região" encoded as Windows-1252 (0xE3 = ã)
        let bytes = [b'R', b'e', b'g', b'i', 0xE3, b'o'];
        assert_eq!(CsvParser::decode_bytes(&bytes), "Região");
    }
}

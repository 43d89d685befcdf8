// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// ToUnicode CMap parsing and PDF string decoding.

use std::collections::HashMap;

/// Character-code → Unicode mapping read from a font's /ToUnicode stream.
#[derive(Debug, Clone, Default)]
pub struct ToUnicode {
    map: HashMap<u32, String>,
    /// Byte width of one source code (1 for simple fonts, 2 for Identity-H).
    code_width: usize,
}

impl ToUnicode {
    /// Parse the bfchar/bfrange sections of a CMap program.
    pub fn parse(program: &[u8]) -> Self {
        let text = String::from_utf8_lossy(program);
        let mut tokens = tokenize(&text).into_iter();
        let mut map = HashMap::new();
        let mut code_width = 0usize;

        while let Some(token) = tokens.next() {
            match token.as_str() {
                "beginbfchar" => {
                    while let Some(src) = tokens.next() {
                        if src == "endbfchar" {
                            break;
                        }
                        let Some(dst) = tokens.next() else { break };
                        let src = parse_hex(&src);
                        code_width = code_width.max(src.len());
                        if let Some(s) = utf16be(&parse_hex(&dst)) {
                            map.insert(code_of(&src), s);
                        }
                    }
                }
                "beginbfrange" => {
                    while let Some(start) = tokens.next() {
                        if start == "endbfrange" {
                            break;
                        }
                        let (Some(end), Some(first)) = (tokens.next(), tokens.next()) else {
                            break;
                        };
                        let start = parse_hex(&start);
                        code_width = code_width.max(start.len());
                        let (lo, hi) = (code_of(&start), code_of(&parse_hex(&end)));
                        if hi < lo || hi - lo > 0xFFFF {
                            continue;
                        }

                        if first == "[" {
                            let mut code = lo;
                            for item in tokens.by_ref() {
                                if item == "]" {
                                    break;
                                }
                                if code <= hi
                                    && let Some(s) = utf16be(&parse_hex(&item))
                                {
                                    map.insert(code, s);
                                }
                                code += 1;
                            }
                        } else {
                            let base = parse_hex(&first);
                            for (offset, code) in (lo..=hi).enumerate() {
                                let mut dst = base.clone();
                                increment_last(&mut dst, offset as u32);
                                if let Some(s) = utf16be(&dst) {
                                    map.insert(code, s);
                                }
                            }
                        }
                    }
                }
                _ => {}
            }
        }

        Self {
            map,
            code_width: code_width.max(1),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.map.is_empty()
    }

    /// Decode a shown string; unmapped codes fall back to Latin-1.
    pub fn decode(&self, bytes: &[u8]) -> String {
        let mut out = String::with_capacity(bytes.len());
        for chunk in bytes.chunks(self.code_width) {
            let code = code_of(chunk);
            match self.map.get(&code) {
                Some(s) => out.push_str(s),
                None if self.code_width == 1 => out.push(chunk[0] as char),
                None => {}
            }
        }
        out
    }
}

/// Decode a PDF string without font information: UTF-16BE with BOM, then
/// UTF-8, then Latin-1.
pub fn decode_plain(bytes: &[u8]) -> String {
    if bytes.len() >= 2 && bytes[0] == 0xFE && bytes[1] == 0xFF {
        return utf16be(&bytes[2..]).unwrap_or_default();
    }
    match std::str::from_utf8(bytes) {
        Ok(s) => s.to_string(),
        Err(_) => bytes.iter().map(|&b| b as char).collect(),
    }
}

fn tokenize(text: &str) -> Vec<String> {
    let mut tokens = Vec::new();
    let mut chars = text.chars().peekable();
    while let Some(&c) = chars.peek() {
        match c {
            '<' => {
                chars.next();
                let mut hex = String::from("<");
                for h in chars.by_ref() {
                    hex.push(h);
                    if h == '>' {
                        break;
                    }
                }
                tokens.push(hex);
            }
            '[' | ']' => {
                chars.next();
                tokens.push(c.to_string());
            }
            '%' => {
                for skipped in chars.by_ref() {
                    if skipped == '\n' || skipped == '\r' {
                        break;
                    }
                }
            }
            c if c.is_whitespace() => {
                chars.next();
            }
            _ => {
                let mut word = String::new();
                while let Some(&w) = chars.peek() {
                    if w.is_whitespace() || matches!(w, '<' | '[' | ']' | '%') {
                        break;
                    }
                    word.push(w);
                    chars.next();
                }
                tokens.push(word);
            }
        }
    }
    tokens
}

fn parse_hex(token: &str) -> Vec<u8> {
    let digits: Vec<u8> = token
        .trim_start_matches('<')
        .trim_end_matches('>')
        .bytes()
        .filter_map(|b| (b as char).to_digit(16).map(|d| d as u8))
        .collect();
    digits
        .chunks(2)
        .map(|pair| match pair {
            [hi, lo] => hi << 4 | lo,
            [hi] => hi << 4,
            _ => 0,
        })
        .collect()
}

fn code_of(bytes: &[u8]) -> u32 {
    bytes.iter().fold(0u32, |acc, &b| (acc << 8) | b as u32)
}

fn increment_last(bytes: &mut [u8], by: u32) {
    if bytes.len() < 2 {
        if let Some(last) = bytes.last_mut() {
            *last = last.wrapping_add(by as u8);
        }
        return;
    }
    let n = bytes.len();
    let value = u16::from_be_bytes([bytes[n - 2], bytes[n - 1]]).wrapping_add(by as u16);
    bytes[n - 2..].copy_from_slice(&value.to_be_bytes());
}

fn utf16be(bytes: &[u8]) -> Option<String> {
    if bytes.len() == 1 {
        return Some((bytes[0] as char).to_string());
    }
    let units: Vec<u16> = bytes
        .chunks_exact(2)
        .map(|pair| u16::from_be_bytes([pair[0], pair[1]]))
        .collect();
    String::from_utf16(&units).ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    const CMAP: &[u8] = br#"
/CIDInit /ProcSet findresource begin
12 dict begin
begincmap
1 begincodespacerange
<0000> <FFFF>
endcodespacerange
2 beginbfchar
<0003> <0020>
<0011> <0048>
endbfchar
2 beginbfrange
<0012> <0014> <0065>
<0020> <0021> [<006F> <0021>]
endbfrange
endcmap
"#;

    #[test]
    fn two_byte_codes_decode_through_chars_and_ranges() {
        let cmap = ToUnicode::parse(CMAP);
        assert!(!cmap.is_empty());
        // H e f g <space> o !
        let shown = [0x00, 0x11, 0x00, 0x12, 0x00, 0x13, 0x00, 0x14, 0x00, 0x03, 0x00, 0x20, 0x00, 0x21];
        assert_eq!(cmap.decode(&shown), "Hefg o!");
    }

    #[test]
    fn plain_strings_fall_back_in_order() {
        assert_eq!(decode_plain(b"Hello"), "Hello");
        assert_eq!(decode_plain(&[0xFE, 0xFF, 0x00, 0x48, 0x00, 0x69]), "Hi");
        assert_eq!(decode_plain(&[0x43, 0x61, 0x66, 0xE9]), "Café");
    }

    #[test]
    fn empty_program_yields_empty_map() {
        assert!(ToUnicode::parse(b"").is_empty());
    }
}

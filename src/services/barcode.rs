//! CODE128B encoding
//!
//! The symbology itself is handled by `barcoders`; this module only selects
//! character set B and turns the module pattern into something the grid and
//! the PDF writer can draw.

use crate::error::BarcodeError;
use barcoders::sym::code128::Code128;

/// Prefix that tells `barcoders` to start in character set B
const CHARSET_B: char = 'Ɓ';

/// Encode a code as CODE128B and return its modules (1 = bar, 0 = space)
pub fn encode_code128b(code: &str) -> Result<Vec<u8>, BarcodeError> {
    let barcode = Code128::new(format!("{}{}", CHARSET_B, code)).map_err(|e| BarcodeError {
        code: code.to_string(),
        reason: format!("{:?}", e),
    })?;
    Ok(barcode.encode())
}

/// Number of terminal cells needed to show `module_count` modules
pub fn terminal_width(module_count: usize) -> usize {
    module_count.div_ceil(2)
}

/// Render modules as one line of half-block glyphs, two modules per cell
///
/// Drawn with a black foreground on a white background so the glyphs read
/// as bars.
pub fn terminal_rows(modules: &[u8]) -> String {
    modules
        .chunks(2)
        .map(|pair| {
            let left = pair[0] == 1;
            let right = pair.get(1).is_some_and(|m| *m == 1);
            match (left, right) {
                (true, true) => '█',
                (true, false) => '▌',
                (false, true) => '▐',
                (false, false) => ' ',
            }
        })
        .collect()
}

/// Collapse modules into (offset, width) runs of consecutive bars
pub fn bar_runs(modules: &[u8]) -> Vec<(usize, usize)> {
    let mut runs = Vec::new();
    let mut current: Option<(usize, usize)> = None;

    for (i, module) in modules.iter().enumerate() {
        if *module == 1 {
            match current {
                Some((_, ref mut width)) => *width += 1,
                None => current = Some((i, 1)),
            }
        } else if let Some(run) = current.take() {
            runs.push(run);
        }
    }
    runs.extend(current);
    runs
}

#[cfg(test)]
mod tests {
    use super::*;

    const START_B: [u8; 11] = [1, 1, 0, 1, 0, 0, 1, 0, 0, 0, 0];

    #[test]
    fn test_encode_starts_with_start_b() {
        let modules = encode_code128b("1001").unwrap();
        assert_eq!(&modules[..11], &START_B);
    }

    #[test]
    fn test_encode_length_grows_with_code() {
        // start + data symbols + checksum + 13-module stop
        let short = encode_code128b("5").unwrap();
        let long = encode_code128b("1001").unwrap();
        assert_eq!(short.len(), 11 * 3 + 13);
        assert_eq!(long.len(), 11 * 6 + 13);
        assert!(long.ends_with(&[1, 1]));
    }

    #[test]
    fn test_encode_negative_number() {
        assert!(encode_code128b("-42").is_ok());
    }

    #[test]
    fn test_terminal_rows_packs_pairs() {
        assert_eq!(terminal_rows(&[1, 1, 1, 0, 0, 1, 0, 0]), "█▌▐ ");
        assert_eq!(terminal_rows(&[1, 0, 1]), "▌▌");
        assert_eq!(terminal_width(3), 2);
        assert_eq!(terminal_width(79), 40);
    }

    #[test]
    fn test_bar_runs() {
        assert_eq!(bar_runs(&[1, 1, 0, 1, 0, 0, 1, 1, 1]), vec![(0, 2), (3, 1), (6, 3)]);
        assert!(bar_runs(&[0, 0]).is_empty());
    }
}

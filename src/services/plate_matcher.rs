//! Búsqueda de formatos de patente en texto OCR
//!
//! El texto se limpia (mayúsculas, solo A-Z y 0-9) y se prueba contra los
//! formatos conocidos en orden de prioridad; gana la primera coincidencia
//! del primer formato que coincida.

use lazy_static::lazy_static;
use regex::Regex;

/// Largo mínimo para aceptar una coincidencia como patente
pub const MIN_PLATE_LENGTH: usize = 5;

/// Un formato de patente: forma legible y expresión regular
pub struct PlatePattern {
    pub shape: &'static str,
    pub regex: Regex,
}

lazy_static! {
    /// Formatos en orden de prioridad
    pub static ref PLATE_PATTERNS: Vec<PlatePattern> = [
        ("AA123BB", r"[A-Z]{2}[0-9]{3}[A-Z]{2}"),
        ("AAA123", r"[A-Z]{3}[0-9]{3}"),
        ("AA123B", r"[A-Z]{2}[0-9]{3}[A-Z]{1}"),
        ("123AAA", r"[0-9]{3}[A-Z]{3}"),
        ("A123AAA", r"[A-Z]{1}[0-9]{3}[A-Z]{3}"),
        ("AAA12B", r"[A-Z]{3}[0-9]{2}[A-Z]{1}"),
        ("A12AAA", r"[A-Z]{1}[0-9]{2}[A-Z]{3}"),
    ]
    .iter()
    .map(|&(shape, pattern)| PlatePattern {
        shape,
        regex: Regex::new(pattern).expect("plate pattern must compile"),
    })
    .collect();
}

/// Patente encontrada y el formato que la reconoció
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlateMatch {
    pub plate: String,
    pub shape: &'static str,
}

/// Limpiar texto OCR: mayúsculas y solo caracteres A-Z / 0-9
pub fn clean_ocr_text(raw: &str) -> String {
    raw.to_uppercase()
        .chars()
        .filter(|c| c.is_ascii_uppercase() || c.is_ascii_digit())
        .collect()
}

/// Buscar la primera patente en texto ya limpio
pub fn find_plate(clean: &str) -> Option<PlateMatch> {
    PLATE_PATTERNS.iter().find_map(|pattern| {
        pattern
            .regex
            .find(clean)
            .filter(|m| m.as_str().len() >= MIN_PLATE_LENGTH)
            .map(|m| PlateMatch {
                plate: m.as_str().to_string(),
                shape: pattern.shape,
            })
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_patterns_are_in_priority_order() {
        let shapes: Vec<&str> = PLATE_PATTERNS.iter().map(|p| p.shape).collect();
        assert_eq!(
            shapes,
            vec!["AA123BB", "AAA123", "AA123B", "123AAA", "A123AAA", "AAA12B", "A12AAA"]
        );
    }

    #[test]
    fn test_clean_plates_are_returned_verbatim() {
        for (input, shape) in [
            ("AB123CD", "AA123BB"),
            ("ABC123", "AAA123"),
            ("AB123C", "AA123B"),
            ("123ABC", "123AAA"),
            ("ABC12D", "AAA12B"),
            ("A12BCD", "A12AAA"),
        ] {
            let found = find_plate(input).unwrap();
            assert_eq!(found.plate, input);
            assert_eq!(found.shape, shape);
        }
    }

    #[test]
    fn test_earlier_pattern_wins_over_exact_shape() {
        // A123AAA contains a 123AAA run, which has higher priority.
        let found = find_plate("A123BCD").unwrap();
        assert_eq!(found.plate, "123BCD");
        assert_eq!(found.shape, "123AAA");
    }

    #[test]
    fn test_no_match() {
        assert_eq!(find_plate("XYZ"), None);
        assert_eq!(find_plate(""), None);
        assert_eq!(find_plate("12345678"), None);
        assert_eq!(find_plate("ABCDEFG"), None);
    }

    #[test]
    fn test_first_occurrence_wins() {
        let found = find_plate("AB123CDXY456ZW").unwrap();
        assert_eq!(found.plate, "AB123CD");
        assert_eq!(found.shape, "AA123BB");
    }

    #[test]
    fn test_clean_ocr_text() {
        assert_eq!(clean_ocr_text(" ab-123 cd\n"), "AB123CD");
        assert_eq!(clean_ocr_text("|[AB 123 CD]|"), "AB123CD");
        assert_eq!(clean_ocr_text("ñandú"), "AND");
    }

    #[test]
    fn test_noisy_ocr_output() {
        let found = find_plate(&clean_ocr_text("  ab 123 cd \n\x0c")).unwrap();
        assert_eq!(found.plate, "AB123CD");
    }
}

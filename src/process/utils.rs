use calamine::Data;

pub fn is_blank(cell: &str) -> bool {
    cell.trim().is_empty()
}

/// Render a workbook cell as the text written to the intermediate CSVs.
pub fn cell_to_string(cell: &Data) -> String {
    match cell {
        Data::Empty => String::new(),
        Data::String(s) => s.clone(),
        Data::Float(n) => format_number(*n),
        Data::Int(n) => n.to_string(),
        Data::Bool(b) => if *b { "TRUE" } else { "FALSE" }.to_string(),
        // serial number, same as the legacy reader reports
        Data::DateTime(dt) => format_number(dt.as_f64()),
        Data::DateTimeIso(s) | Data::DurationIso(s) => s.clone(),
        Data::Error(e) => format!("#{:?}", e),
    }
}

/// Integers without decimals, everything else in shortest form.
pub fn format_number(n: f64) -> String {
    if n.fract() == 0.0 && n.abs() < 1e15 {
        format!("{}", n as i64)
    } else {
        format!("{}", n)
    }
}

/// Parse a fiscal year from a file stem such as `2019` (from `2019.xls`).
pub fn year_from_stem(stem: &str) -> Option<u16> {
    let stem = stem.trim();
    if stem.len() == 4 && stem.chars().all(|c| c.is_ascii_digit()) {
        stem.parse().ok()
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn numbers_render_like_the_sheet() {
        assert_eq!(cell_to_string(&Data::Float(1000.0)), "1000");
        assert_eq!(cell_to_string(&Data::Float(12.5)), "12.5");
        assert_eq!(cell_to_string(&Data::Int(-3)), "-3");
        assert_eq!(cell_to_string(&Data::Empty), "");
        assert_eq!(cell_to_string(&Data::String("Aprobado".into())), "Aprobado");
    }

    #[test]
    fn year_stems() {
        assert_eq!(year_from_stem("2015"), Some(2015));
        assert_eq!(year_from_stem("data_total"), None);
        assert_eq!(year_from_stem("20155"), None);
    }
}

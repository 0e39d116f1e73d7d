//! Mapping between Sheets value ranges and checkout records.
//!
//! The Sheets API returns a value range as `{"values": [[...], ...]}` where
//! each inner array is one row of loosely typed cells. Reading is tolerant:
//! the first row is always treated as a header, short rows are dropped, and
//! every cell is coerced to a string.

use serde_json::Value;

use crate::checkout::{CheckoutRecord, COLUMN_COUNT};

/// Number of leading rows treated as a header and never returned.
pub const HEADER_ROWS: usize = 1;

/// Coerce a single cell to a string.
///
/// `null` becomes the empty string, arrays are joined with commas, and
/// numbers print the way a JavaScript runtime prints them: `1.0` reads back
/// as `"1"`, `1e21` as `"1e+21"`.
pub fn coerce_cell(cell: &Value) -> String {
    match cell {
        Value::Null => String::new(),
        Value::String(s) => s.clone(),
        Value::Bool(b) => b.to_string(),
        Value::Number(n) => n.as_f64().map(number_to_string).unwrap_or_default(),
        Value::Array(items) => items.iter().map(coerce_cell).collect::<Vec<_>>().join(","),
        Value::Object(_) => "[object Object]".to_string(),
    }
}

/// ECMAScript `Number::toString` for finite values.
///
/// Plain notation for decimal exponents in `-7..21`, exponent notation with
/// an explicit sign outside it. Both zeros print as `"0"`.
fn number_to_string(f: f64) -> String {
    if f == 0.0 || !f.is_finite() {
        return "0".to_string();
    }
    if f < 0.0 {
        return format!("-{}", number_to_string(-f));
    }

    // Shortest round-trip digits, e.g. "1.2345e3".
    let sci = format!("{f:e}");
    let Some((mantissa, exp)) = sci.split_once('e') else {
        return sci;
    };
    let digits: String = mantissa.chars().filter(char::is_ascii_digit).collect();
    let Ok(exp) = exp.parse::<i32>() else {
        return sci;
    };

    let k = digits.len() as i32;
    let n = exp + 1;

    if k <= n && n <= 21 {
        format!("{digits}{}", "0".repeat((n - k) as usize))
    } else if 0 < n && n <= 21 {
        let (int, frac) = digits.split_at(n as usize);
        format!("{int}.{frac}")
    } else if -6 < n && n <= 0 {
        format!("0.{}{digits}", "0".repeat((-n) as usize))
    } else {
        let sign = if n - 1 < 0 { '-' } else { '+' };
        let e = (n - 1).abs();
        let (lead, rest) = digits.split_at(1);
        if rest.is_empty() {
            format!("{lead}e{sign}{e}")
        } else {
            format!("{lead}.{rest}e{sign}{e}")
        }
    }
}

/// Map raw rows to records, skipping the header row.
///
/// Rows with fewer than [`COLUMN_COUNT`] cells, and rows that are not
/// arrays at all, are dropped without error. Cells past column E are
/// ignored.
pub fn records_from_values(rows: &[Value]) -> Vec<CheckoutRecord> {
    rows.iter()
        .skip(HEADER_ROWS)
        .filter_map(Value::as_array)
        .filter(|cells| cells.len() >= COLUMN_COUNT)
        .map(|cells| {
            CheckoutRecord::from_row([
                coerce_cell(&cells[0]),
                coerce_cell(&cells[1]),
                coerce_cell(&cells[2]),
                coerce_cell(&cells[3]),
                coerce_cell(&cells[4]),
            ])
        })
        .collect()
}

/// Map a Sheets value-range body to records.
///
/// A missing or non-array `values` member yields no records.
pub fn records_from_sheet_json(body: &Value) -> Vec<CheckoutRecord> {
    body.get("values")
        .and_then(Value::as_array)
        .map(|rows| records_from_values(rows))
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;
    use crate::checkout::{CheckoutStatus, DeviceType};

    #[test]
    fn coerce_cell_matches_loose_string_conversion() {
        assert_eq!(coerce_cell(&json!(null)), "");
        assert_eq!(coerce_cell(&json!("Mac Mini")), "Mac Mini");
        assert_eq!(coerce_cell(&json!(true)), "true");
        assert_eq!(coerce_cell(&json!(42)), "42");
        assert_eq!(coerce_cell(&json!(-7)), "-7");
        assert_eq!(coerce_cell(&json!(1.0)), "1");
        assert_eq!(coerce_cell(&json!(2.5)), "2.5");
        assert_eq!(coerce_cell(&json!([1, "a", null])), "1,a,");
        assert_eq!(coerce_cell(&json!({"k": 1})), "[object Object]");
    }

    #[test]
    fn numbers_print_like_javascript() {
        assert_eq!(coerce_cell(&json!(0.1)), "0.1");
        assert_eq!(coerce_cell(&json!(123.456)), "123.456");
        assert_eq!(coerce_cell(&json!(-0.0)), "0");
        assert_eq!(coerce_cell(&json!(1e20)), "100000000000000000000");
        assert_eq!(coerce_cell(&json!(1e21)), "1e+21");
        assert_eq!(coerce_cell(&json!(1.5e22)), "1.5e+22");
        assert_eq!(coerce_cell(&json!(0.000001)), "0.000001");
        assert_eq!(coerce_cell(&json!(1e-7)), "1e-7");
        assert_eq!(coerce_cell(&json!(-2.5e-8)), "-2.5e-8");
        assert_eq!(coerce_cell(&json!(u64::MAX)), "18446744073709552000");
    }

    #[test]
    fn header_row_is_always_skipped() {
        // Row 0 looks like data but must still be discarded.
        let rows = json!([
            ["Alice", "Google Pixel", "PX-1", "t0", "checked-out"],
            ["Bob", "Mac Mini", "MM-2", "t1", "checked-in"],
        ]);
        let records = records_from_values(rows.as_array().unwrap());

        assert_eq!(records.len(), 1);
        assert_eq!(records[0].person_name, "Bob");
        assert_eq!(records[0].device_type, DeviceType::MacMini);
        assert_eq!(records[0].status, CheckoutStatus::CheckedIn);
    }

    #[test]
    fn short_rows_are_dropped_silently() {
        let body = json!({
            "values": [
                ["Name", "Device", "ID", "Time", "Status"],
                ["Alice", "Pixel"],
                ["Carol", "Apple iPhone", "IP-3", "t2", "checked-out"],
                [],
            ]
        });
        let records = records_from_sheet_json(&body);

        assert_eq!(records.len(), 1);
        assert_eq!(records[0].person_name, "Carol");
    }

    #[test]
    fn extra_columns_are_ignored_and_numbers_coerced() {
        let body = json!({
            "values": [
                ["header"],
                ["Dave", "Google Pixel", 1234, "t3", "checked-out", "note", 9],
            ]
        });
        let records = records_from_sheet_json(&body);

        assert_eq!(records.len(), 1);
        assert_eq!(records[0].device_id, "1234");
        assert_eq!(records[0].status, CheckoutStatus::CheckedOut);
    }

    #[test]
    fn out_of_set_enum_cells_pass_through() {
        let body = json!({
            "values": [
                ["header"],
                ["Eve", "Commodore 64", "C64", "t4", null],
            ]
        });
        let records = records_from_sheet_json(&body);

        assert_eq!(
            records[0].device_type,
            DeviceType::Other("Commodore 64".to_string())
        );
        assert_eq!(records[0].status, CheckoutStatus::Other(String::new()));
    }

    #[test]
    fn missing_values_member_yields_no_records() {
        assert!(records_from_sheet_json(&json!({"range": "Sheet1!A1:E1"})).is_empty());
        assert!(records_from_sheet_json(&json!({"values": "oops"})).is_empty());
        assert!(records_from_sheet_json(&json!({"values": [["only header"]]})).is_empty());
    }
}

use shared::protocol::{
    DRIVER_NOISE, NO_CURRENT_COMMENT, PLANNING_UNIT_SEPARATOR, UNKNOWN_MODEL,
};
use shared::types::PrinterRecord;

/// Leading segment of a printer name, e.g. "NORTH" for "NORTH-LIB-01".
/// Names without a separator are their own planning unit.
pub fn planning_unit(printer_name: &str) -> &str {
    printer_name
        .split(PLANNING_UNIT_SEPARATOR)
        .next()
        .unwrap_or(printer_name)
}

/// The printer's comment, or the placeholder when it has none
pub fn current_comment(printer: &PrinterRecord) -> &str {
    printer.comment.as_deref().unwrap_or(NO_CURRENT_COMMENT)
}

/// Strip vendor noise from a driver name and normalise its whitespace.
/// Removal repeats until no token is left, since cutting one token out can
/// join its neighbours into another ("AltPCL6aLink").
pub fn clean_model(driver_name: Option<&str>) -> String {
    let Some(driver) = driver_name else {
        return UNKNOWN_MODEL.to_string();
    };

    let mut stripped = driver.to_string();
    while DRIVER_NOISE.iter().any(|token| stripped.contains(token)) {
        for token in DRIVER_NOISE {
            stripped = stripped.replace(token, "");
        }
    }

    stripped.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// A host value is treated as a hostname as soon as it contains a letter.
pub fn is_hostname(host_value: &str) -> bool {
    host_value.chars().any(char::is_alphabetic)
}

/// "{unit} - {model} - {address}", trimmed on the outside only.
/// An empty component leaves its separators in place.
pub fn compose_comment(planning_unit: &str, model: &str, address: &str) -> String {
    format!("{} - {} - {}", planning_unit, model, address)
        .trim()
        .to_string()
}

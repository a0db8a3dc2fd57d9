/// Comment substituted in the log when a printer has none
pub const NO_CURRENT_COMMENT: &str = "No current comment";

/// Host value used when a printer's port is not in the inventory
pub const UNKNOWN_HOST: &str = "Unknown";

/// Address used when a hostname cannot be resolved
pub const UNKNOWN_IP: &str = "Unknown IP";

/// Model used when a printer reports no driver
pub const UNKNOWN_MODEL: &str = "Unknown Model";

/// Vendor tokens stripped from driver names, in removal order
pub const DRIVER_NOISE: [&str; 4] = ["AltaLink", "VersaLink", "PCL6", "Copier-Printer"];

/// Separator between the planning unit and the rest of a printer name
pub const PLANNING_UNIT_SEPARATOR: char = '-';

/// First line of every update log
pub const LOG_HEADER: &str = "Printer Name,Original Comment,Updated Comment";

/// Default file names
pub const DEFAULT_LIST_FILE: &str = "printerlist.txt";
pub const DEFAULT_LOG_FILE: &str = "Printer_Comment_Updates.csv";

//! Output formatting for the terminal.
//!
//! Tables use `tabled`; state words and warnings are colored with
//! `owo-colors`.

use owo_colors::OwoColorize;
use tabled::settings::Style;
use tabled::{Table, Tabled};

use hubmate_core::KindGroup;

#[derive(Tabled)]
struct DeviceRow {
    #[tabled(rename = "Group")]
    group: &'static str,
    #[tabled(rename = "Device")]
    device: String,
    #[tabled(rename = "Aliases")]
    aliases: String,
}

/// Render the grouped device listing as one table.
///
/// The group name is printed once per group; aliases are comma-joined,
/// longest first (full name down to abbreviation).
pub fn device_table(groups: &[(KindGroup, Vec<(String, Vec<String>)>)]) -> String {
    let mut rows = Vec::new();
    for (group, devices) in groups {
        let mut first = true;
        for (label, aliases) in devices {
            rows.push(DeviceRow {
                group: if first { group.title() } else { "" },
                device: label.clone(),
                aliases: aliases.join(", "),
            });
            first = false;
        }
    }
    Table::new(rows).with(Style::rounded()).to_string()
}

/// Print index-build warnings (duplicate aliases, unabbreviated names).
pub fn print_warnings(warnings: &[String], quiet: bool) {
    if quiet {
        return;
    }
    for warning in warnings {
        eprintln!("{}", warning.yellow());
    }
}

pub fn print_success(message: &str, quiet: bool) {
    if !quiet {
        println!("{}", message.green());
    }
}

pub fn print_line(message: &str, quiet: bool) {
    if !quiet {
        println!("{message}");
    }
}

//! Banner and field printing.

/// Print the application banner.
pub fn print_banner() {
    println!("\n\x1b[1mhydrobuf field lengths\x1b[0m");
    println!("═══════════════════════════════════════");
}

/// Print one labelled byte length.
pub fn print_field(label: &str, bytes: usize) {
    println!("\x1b[1m{:<16}\x1b[0m {} bytes", label, bytes);
}

fn main() {
    if let Err(err) = sheet_insights::run() {
        std::process::exit(sheet_insights::report_failure(&err));
    }
}

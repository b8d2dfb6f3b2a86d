fn main() {
    if let Err(err) = sales_cleaner::run() {
        eprintln!("error: {err:#}");
        std::process::exit(1);
    }
}

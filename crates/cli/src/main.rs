fn main() {
    if let Err(e) = rescope_cli::run() {
        eprintln!("Error: {}", e);
        std::process::exit(2);
    }
}

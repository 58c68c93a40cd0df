fn main() {
    if let Err(err) = codepath_cli::run() {
        eprintln!("error: {err}");
        std::process::exit(1);
    }
}

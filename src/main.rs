fn main() {
    if let Err(e) = medassist_lib::run() {
        eprintln!("medassist: {e}");
        std::process::exit(1);
    }
}

fn main() {
    if let Err(err) = dataset_quality::run() {
        eprintln!("error: {err}");
        std::process::exit(1);
    }
}

fn main() {
    if let Err(err) = sector_wheel::run() {
        eprintln!("error: {err:#}");
        std::process::exit(1);
    }
}

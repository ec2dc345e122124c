fn main() {
    #[cfg(feature = "cli")]
    deltagolomb::cli::run();

    #[cfg(not(feature = "cli"))]
    {
        eprintln!("deltagolomb: CLI not enabled. Rebuild with `--features cli`.");
        std::process::exit(1);
    }
}

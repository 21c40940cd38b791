fn main() {
    #[cfg(feature = "cli")]
    wwcodec::cli::run();

    #[cfg(not(feature = "cli"))]
    {
        eprintln!("wwcodec: CLI not enabled. Rebuild with `--features cli`.");
        std::process::exit(1);
    }
}

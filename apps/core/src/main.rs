fn main() {
    let args: Vec<String> = std::env::args().skip(1).collect();
    let options = match wslsearch_core::runtime::parse_cli_args(&args) {
        Ok(options) => options,
        Err(error) => {
            if !error.use_stderr() {
                let _ = error.print();
                std::process::exit(0);
            }
            eprintln!("[wslsearch-core] {error}");
            std::process::exit(2);
        }
    };

    if let Err(error) = wslsearch_core::runtime::run_with_options(options) {
        eprintln!("[wslsearch-core] runtime failed: {error}");
        std::process::exit(1);
    }
}

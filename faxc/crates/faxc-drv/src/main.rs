use faxc_drv::{parse_args, run, ParsedArgs, USAGE};

fn main() {
    faxc_drv::init_logging();

    let args = std::env::args().skip(1);
    let parsed = match parse_args(args) {
        Ok(parsed) => parsed,
        Err(error) => {
            eprintln!("error: {error:#}");
            std::process::exit(1);
        }
    };

    let config = match parsed {
        ParsedArgs::Help => {
            print!("{USAGE}");
            return;
        }
        ParsedArgs::Run(config) => config,
    };

    if let Err(error) = run(&config) {
        eprintln!("error: {error:#}");
        std::process::exit(1);
    }
}

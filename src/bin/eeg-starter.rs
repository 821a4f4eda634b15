use clap::Parser;
use log::{info, LevelFilter};
use msgbox::IconType;
use eeg_starter::{init_logging, run, Args};
use eeg_starter::error::{error_msgbox, AppRunError, ConfigError, APP_TITLE};

fn main() -> Result<(), AppRunError> {
    let args = Args::parse();

    init_logging(if args.verbose { LevelFilter::Debug } else { LevelFilter::Info });
    info!("{}", APP_TITLE);

    match run(args) {
        Err(AppRunError::ConfigError { source: ConfigError::CanNotLock { .. } }) => {
            msgbox::create(
                APP_TITLE,
                "This application has already been started",
                IconType::Error,
            ).expect("Could not create msgbox");
            Ok(())
        },
        Err(err) => {
            error_msgbox("Unexpected error", &err);
            Err(err)
        }
        Ok(_) => Ok(())
    }
}

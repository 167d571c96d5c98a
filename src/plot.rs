use super::VERSION;
use clap::{App, Arg, ArgMatches};
use std::ffi::OsString;
use std::path::PathBuf;

pub fn cli_app() -> App<'static, 'static> {
    let arg_dir = Arg::with_name("gv_sampling_dir_path")
        .help("GasViewer data directory path.")
        .short("d")
        .long("gv-sampling-dir-path")
        .value_name("GV_SAMPLING_DIR_PATH")
        .takes_value(true)
        .required(true);
    let arg_open = Arg::with_name("open")
        .help("Open the plot in the browser (default: false).")
        .short("o")
        .long("open")
        .takes_value(false);
    App::new("gv_plot")
        .version(VERSION.unwrap_or("unknown"))
        .author("Luca Peruzzo")
        .about("cli app to plot the GasViewer sampling data")
        .arg(arg_dir)
        .arg(arg_open)
}

fn from_matches(cli_args: &ArgMatches) -> (PathBuf, bool) {
    let gv_sampling_dir_path =
        PathBuf::from(cli_args.value_of_os("gv_sampling_dir_path").unwrap_or_default());
    let open = cli_args.is_present("open");
    (gv_sampling_dir_path, open)
}

/// Takes the CLI arguments that select the sampling directory and the browser opening;
/// exits on --help, --version and usage errors.
pub fn parse_cli() -> (PathBuf, bool) {
    from_matches(&cli_app().get_matches())
}

pub fn parse_cli_from<I, T>(args: I) -> Result<(PathBuf, bool), clap::Error>
where
    I: IntoIterator<Item = T>,
    T: Into<OsString> + Clone,
{
    let cli_args = cli_app().get_matches_from_safe(args)?;
    Ok(from_matches(&cli_args))
}

use gv_sampling::logging;
use gv_sampling::plot::parse_cli;
use gv_sampling::report::{plot_gv_sampling, SystemBrowser};

fn main() {
    let (gv_sampling_dir_path, open) = parse_cli();
    logging::init();
    tracing::info!(
        dir = %gv_sampling_dir_path.display(),
        open,
        "plotting GasViewer sampling"
    );
    match plot_gv_sampling(&gv_sampling_dir_path, open, &SystemBrowser) {
        Ok((_, html_file_path)) => println!("plot saved to {}", html_file_path.display()),
        Err(e) => {
            eprintln!("error: {}", e);
            std::process::exit(1);
        }
    }
}

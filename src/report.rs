use super::chart;
use super::error::{GvError, Result};
use super::{GvSampling, PLOT_HTML_FILE_NAME};
use chrono::prelude::*;
use std::path::{Path, PathBuf};
use std::process::Command;

/// Opens a saved plot for the user.
pub trait Launcher {
    fn open(&self, path: &Path) -> Result<()>;
}

/// Opens files with the platform's default browser, without waiting for it.
pub struct SystemBrowser;

impl Launcher for SystemBrowser {
    fn open(&self, path: &Path) -> Result<()> {
        #[cfg(target_os = "windows")]
        let mut cmd = {
            let mut c = Command::new("cmd");
            c.args(["/C", "start", ""]).arg(path);
            c
        };
        #[cfg(target_os = "macos")]
        let mut cmd = {
            let mut c = Command::new("open");
            c.arg(path);
            c
        };
        #[cfg(not(any(target_os = "windows", target_os = "macos")))]
        let mut cmd = {
            let mut c = Command::new("xdg-open");
            c.arg(path);
            c
        };
        cmd.spawn()
            .map_err(|e| GvError::Browser(format!("{}: {}", path.display(), e)))?;
        tracing::info!(path = %path.display(), "opened plot in browser");
        Ok(())
    }
}

fn escape_html(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}

/// standalone html page with the svg panels stacked in order
pub fn column_html(title: &str, panels: &[String]) -> String {
    let title = escape_html(title);
    let generated = Local::now().format("%Y-%m-%d %H:%M:%S");
    let mut html = String::with_capacity(panels.iter().map(|p| p.len()).sum::<usize>() + 512);
    html.push_str("<!DOCTYPE html>\n<html lang=\"en\">\n<head>\n<meta charset=\"utf-8\">\n");
    html.push_str(&format!("<title>{}</title>\n", title));
    html.push_str("<style>body{font-family:sans-serif;margin:20px}.panel{margin-bottom:10px}</style>\n");
    html.push_str("</head>\n<body>\n");
    html.push_str(&format!(
        "<h1>{}</h1>\n<p>generated {}</p>\n",
        title, generated
    ));
    for panel in panels.iter() {
        html.push_str("<div class=\"panel\">\n");
        html.push_str(panel);
        html.push_str("\n</div>\n");
    }
    html.push_str("</body>\n</html>\n");
    html
}

/// writes the plot page into the destination directory, opening it if requested
pub fn save_column_plot_as_html(
    panels: &[String],
    dst_dir_path: &Path,
    open: bool,
    launcher: &dyn Launcher,
) -> Result<(PathBuf, String)> {
    let title = match dst_dir_path.file_name() {
        Some(name) => format!("GasViewer sampling {}", name.to_string_lossy()),
        None => "GasViewer sampling".to_string(),
    };
    let html = column_html(&title, panels);
    let html_file_path = dst_dir_path.join(PLOT_HTML_FILE_NAME);
    std::fs::write(&html_file_path, &html).map_err(|source| GvError::Io {
        path: html_file_path.clone(),
        source,
    })?;
    tracing::info!(path = %html_file_path.display(), "saved plot");
    if open {
        launcher.open(&html_file_path)?;
    }
    Ok((html_file_path, html))
}

/// Loads the sampling directory, plots it to plot.html inside the same directory
/// and returns the series with the path of the plot.
pub fn plot_gv_sampling(
    gv_sampling_dir_path: &Path,
    open: bool,
    launcher: &dyn Launcher,
) -> Result<(GvSampling, PathBuf)> {
    let sampling = GvSampling::from_dir(gv_sampling_dir_path)?;
    tracing::info!(
        dir = %gv_sampling_dir_path.display(),
        samples = sampling.len(),
        "loaded sampling"
    );
    let panels = chart::render_column(&sampling)?;
    let (html_file_path, _) =
        save_column_plot_as_html(&panels, gv_sampling_dir_path, open, launcher)?;
    Ok((sampling, html_file_path))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;

    #[derive(Default)]
    struct Recorder {
        opened: RefCell<Vec<PathBuf>>,
    }

    impl Launcher for Recorder {
        fn open(&self, path: &Path) -> Result<()> {
            self.opened.borrow_mut().push(path.to_path_buf());
            Ok(())
        }
    }

    struct Broken;

    impl Launcher for Broken {
        fn open(&self, _path: &Path) -> Result<()> {
            Err(GvError::Browser("no browser".to_string()))
        }
    }

    #[test]
    fn html_keeps_panel_order() {
        let panels = vec!["<svg>first</svg>".to_string(), "<svg>second</svg>".to_string()];
        let html = column_html("a <b> & c", &panels);
        assert!(html.starts_with("<!DOCTYPE html>"));
        assert!(html.contains("<title>a &lt;b&gt; &amp; c</title>"));
        let first = html.find("first").unwrap();
        let second = html.find("second").unwrap();
        assert!(first < second);
    }

    #[test]
    fn save_without_open() {
        let tmp = tempfile::tempdir().unwrap();
        let recorder = Recorder::default();
        let panels = vec!["<svg></svg>".to_string()];
        let (path, html) = save_column_plot_as_html(&panels, tmp.path(), false, &recorder).unwrap();
        assert_eq!(path, tmp.path().join(PLOT_HTML_FILE_NAME));
        assert_eq!(std::fs::read_to_string(&path).unwrap(), html);
        assert!(recorder.opened.borrow().is_empty());
    }

    #[test]
    fn save_with_open() {
        let tmp = tempfile::tempdir().unwrap();
        let recorder = Recorder::default();
        let (path, _) = save_column_plot_as_html(&[], tmp.path(), true, &recorder).unwrap();
        assert_eq!(*recorder.opened.borrow(), vec![path]);
    }

    #[test]
    fn launcher_failure_is_reported() {
        let tmp = tempfile::tempdir().unwrap();
        let err = save_column_plot_as_html(&[], tmp.path(), true, &Broken).unwrap_err();
        assert!(matches!(err, GvError::Browser(_)));
        // the plot is saved before opening
        assert!(tmp.path().join(PLOT_HTML_FILE_NAME).is_file());
    }
}

use gv_sampling::report::{plot_gv_sampling, Launcher};
use gv_sampling::{GvError, CSV_DATA_FILE_NAME, PLOT_HTML_FILE_NAME};
use std::cell::RefCell;
use std::path::{Path, PathBuf};
use std::process::Command;

const DATA: &str = "\
unix_time,vg_m3,vm_m3,vb_m3,pulses_reed_1,pulses_reed_2,q_m3h
1700000000.0,10.000,10.010,9.800,100,100,1.20
1700000002.0,10.001,10.011,9.801,101,100,1.25
1700000004.1,10.002,null,9.802,102,101,1.22
1700000006.0,10.003,10.013,9.803,null,102,null
1700000008.0,10.004,10.014,9.804,105,103,1.21
";

fn sampling_dir(data: &str) -> tempfile::TempDir {
    let tmp = tempfile::tempdir().unwrap();
    std::fs::write(tmp.path().join(CSV_DATA_FILE_NAME), data).unwrap();
    tmp
}

fn gv_plot() -> Command {
    Command::new(env!("CARGO_BIN_EXE_gv_plot"))
}

#[derive(Default)]
struct Recorder {
    opened: RefCell<Vec<PathBuf>>,
}

impl Launcher for Recorder {
    fn open(&self, path: &Path) -> gv_sampling::Result<()> {
        self.opened.borrow_mut().push(path.to_path_buf());
        Ok(())
    }
}

#[test]
fn pipeline_writes_plot_next_to_data() {
    let tmp = sampling_dir(DATA);
    let recorder = Recorder::default();
    let (sampling, html_file_path) = plot_gv_sampling(tmp.path(), false, &recorder).unwrap();
    assert_eq!(sampling.len(), 5);
    assert_eq!(sampling.time_s[4], 8.);
    assert_eq!(html_file_path, tmp.path().join(PLOT_HTML_FILE_NAME));
    let html = std::fs::read_to_string(&html_file_path).unwrap();
    assert_eq!(html.matches("<svg").count(), 7);
    assert!(recorder.opened.borrow().is_empty());
}

#[test]
fn pipeline_opens_plot_when_requested() {
    let tmp = sampling_dir(DATA);
    let recorder = Recorder::default();
    let (_, html_file_path) = plot_gv_sampling(tmp.path(), true, &recorder).unwrap();
    assert_eq!(*recorder.opened.borrow(), vec![html_file_path]);
}

#[test]
fn pipeline_rejects_unsorted_times() {
    let tmp = sampling_dir(
        "unix_time,vg_m3,vm_m3,vb_m3,pulses_reed_1,pulses_reed_2,q_m3h\n\
         2.0,1,1,1,1,1,1\n\
         1.0,1,1,1,1,1,1\n",
    );
    let err = plot_gv_sampling(tmp.path(), false, &Recorder::default()).unwrap_err();
    assert!(matches!(err, GvError::UnsortedUnixTime));
    assert!(!tmp.path().join(PLOT_HTML_FILE_NAME).exists());
}

#[test]
fn pipeline_rejects_header_only_file() {
    let tmp = sampling_dir("unix_time,vg_m3,vm_m3,vb_m3,pulses_reed_1,pulses_reed_2,q_m3h\n");
    let err = plot_gv_sampling(tmp.path(), false, &Recorder::default()).unwrap_err();
    assert!(matches!(err, GvError::EmptySampling));
    assert!(!tmp.path().join(PLOT_HTML_FILE_NAME).exists());
}

#[test]
fn pipeline_plots_infinite_volume() {
    let tmp = sampling_dir(
        "unix_time,vg_m3,vm_m3,vb_m3,pulses_reed_1,pulses_reed_2,q_m3h\n\
         1,1,1,1,1,1,1\n\
         2,inf,1,1,1,1,1\n\
         3,1e308,-1e308,1,1,1,-inf\n",
    );
    let (sampling, html_file_path) =
        plot_gv_sampling(tmp.path(), false, &Recorder::default()).unwrap();
    assert!(sampling.vg_m3[1].is_infinite());
    assert!(html_file_path.is_file());
}

#[test]
fn pipeline_rejects_infinite_time() {
    let tmp = sampling_dir(
        "unix_time,vg_m3,vm_m3,vb_m3,pulses_reed_1,pulses_reed_2,q_m3h\n\
         1,1,1,1,1,1,1\n\
         inf,1,1,1,1,1,1\n",
    );
    let err = plot_gv_sampling(tmp.path(), false, &Recorder::default()).unwrap_err();
    assert!(matches!(err, GvError::InvalidUnixTime { line: 3 }));
    assert!(!tmp.path().join(PLOT_HTML_FILE_NAME).exists());
}

#[test]
fn cli_plots_valid_directory() {
    let tmp = sampling_dir(DATA);
    let output = gv_plot().arg("-d").arg(tmp.path()).output().unwrap();
    assert!(output.status.success(), "stderr: {}", String::from_utf8_lossy(&output.stderr));
    assert!(tmp.path().join(PLOT_HTML_FILE_NAME).is_file());
}

#[test]
fn cli_fails_on_missing_directory() {
    let tmp = tempfile::tempdir().unwrap();
    let missing = tmp.path().join("no_such_session");
    let output = gv_plot()
        .arg("--gv-sampling-dir-path")
        .arg(&missing)
        .output()
        .unwrap();
    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("directory not found"), "stderr: {}", stderr);
}

#[test]
fn cli_help_does_not_need_directory() {
    let output = gv_plot().arg("-h").output().unwrap();
    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("--gv-sampling-dir-path"));
    assert!(stdout.contains("--open"));
}

#[test]
fn cli_requires_directory() {
    let output = gv_plot().output().unwrap();
    assert!(!output.status.success());
}

use {
    rotalog::{LineFormat, LoggerBuilder},
    std::{env, fs, process::Command},
};

/// Set in the child process: the path it should log to before exiting.
const CHILD_LOG: &str = "ROTALOG_FATAL_CHILD_LOG";

#[test]
fn fatal_writes_the_line_then_exits_with_status_one() {
    if let Ok(path) = env::var(CHILD_LOG) {
        let logger = LoggerBuilder::new(path).line_format(LineFormat::NONE).build().unwrap();
        rotalog::fatal!(logger => "giving up after {} attempts", 3);
    }

    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("app.log");
    let output = Command::new(env::current_exe().unwrap())
        .args(["--exact", "fatal_writes_the_line_then_exits_with_status_one", "--nocapture"])
        .env(CHILD_LOG, &path)
        .output()
        .unwrap();

    assert_eq!(output.status.code(), Some(1));
    assert_eq!(fs::read_to_string(&path).unwrap(), "[Fatal] giving up after 3 attempts\n");
}

use assert_cmd::cargo::cargo_bin_cmd;
use serde_json::Value;
use std::fs;
use std::path::{Path, PathBuf};
use std::process::Output;
use tempfile::TempDir;

struct Workspace {
    temp: TempDir,
}

impl Workspace {
    fn new() -> Self {
        let temp = TempDir::new().expect("temp dir");
        fs::create_dir_all(temp.path().join("config")).expect("config dir");
        fs::create_dir_all(temp.path().join("data")).expect("data dir");
        Self { temp }
    }

    fn path(&self, name: &str) -> PathBuf {
        self.temp.path().join(name)
    }

    fn log_path(&self) -> PathBuf {
        self.path("logs/enviados.jsonl")
    }

    fn output(&self, args: &[&str]) -> Output {
        cargo_bin_cmd!("zapper")
            .current_dir(self.temp.path())
            .env("XDG_CONFIG_HOME", self.path("config"))
            .env("XDG_DATA_HOME", self.path("data"))
            .env_remove("RUST_LOG")
            .args(["--log-path", self.log_path().to_str().expect("log path")])
            .args([
                "--history-path",
                self.path("PyWhatKit_DB.txt").to_str().expect("history path"),
            ])
            .args(args)
            .output()
            .expect("run command")
    }

    fn run(&self, args: &[&str]) -> String {
        let output = self.output(args);
        assert!(output.status.success(), "command failed: {:?}", output);
        String::from_utf8(output.stdout).expect("utf8")
    }

    fn run_json(&self, args: &[&str]) -> Value {
        let mut full = vec!["--json"];
        full.extend_from_slice(args);
        let stdout = self.run(&full);
        serde_json::from_str(&stdout).expect("parse json")
    }

    fn log_lines(&self) -> Vec<Value> {
        match fs::read_to_string(self.log_path()) {
            Ok(contents) => contents
                .lines()
                .map(|line| serde_json::from_str(line).expect("log json"))
                .collect(),
            Err(_) => Vec::new(),
        }
    }

    fn write_log(&self, numbers: &[&str]) {
        let path = self.log_path();
        fs::create_dir_all(path.parent().expect("parent")).expect("log dir");
        let contents: String = numbers
            .iter()
            .map(|number| format!("{{\"numero\":\"{number}\",\"msg_hash\":\"seed\"}}\n"))
            .collect();
        fs::write(path, contents).expect("write log");
    }

    fn use_silent_delivery(&self) {
        self.write_config("[delivery]\nprogram = \"true\"\n");
    }

    fn write_config(&self, contents: &str) -> PathBuf {
        let path = self.path("config/zapper/config.toml");
        fs::create_dir_all(path.parent().expect("parent")).expect("config dir");
        fs::write(&path, contents).expect("write config");
        restrict_permissions(&path);
        path
    }
}

fn restrict_permissions(path: &Path) {
    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        let mut perms = fs::metadata(path).expect("metadata").permissions();
        perms.set_mode(0o600);
        fs::set_permissions(path, perms).expect("chmod");
    }
}

#[test]
fn normalize_prints_canonical_numbers() {
    let ws = Workspace::new();
    let value = ws.run_json(&["normalize", "11999999999", "0055 11 99999 9999", "123"]);
    let items = value.as_array().expect("array");
    assert_eq!(items[0]["number"], "+5511999999999");
    assert_eq!(items[1]["number"], "+5511999999999");
    assert!(items[2]["number"].is_null());
    assert_eq!(items[2]["rejected"], "too_short");
}

#[test]
fn dry_run_batch_classifies_without_recording() {
    let ws = Workspace::new();
    let report = ws.run_json(&[
        "send",
        "--dry-run",
        "--message",
        "Ola!",
        "--number",
        "11999999999",
        "--number",
        "+55 11 99999-9999",
        "--number",
        "12",
        "--number",
        "21988887777",
    ]);

    assert_eq!(report["sent"].as_array().expect("sent").len(), 2);
    assert_eq!(report["skipped"][0]["number"], "+5511999999999");
    assert_eq!(report["skipped"][0]["reason"], "duplicado");
    assert_eq!(report["rejected"][0]["raw"], "12");
    assert_eq!(report["results"][1]["outcome"], "pulado: duplicado");
    assert_eq!(report["dry_run"], true);
    assert!(ws.log_lines().is_empty());
}

#[test]
fn dry_run_still_skips_logged_numbers() {
    let ws = Workspace::new();
    ws.write_log(&["+5511999999999"]);
    let args = ["send", "--dry-run", "--message", "Ola!", "--number", "11999999999"];

    let stdout = ws.run(&args);
    assert!(stdout.contains("+5511999999999: pulado: log_local"));

    let mut forced = args.to_vec();
    forced.push("--force-resend");
    let stdout = ws.run(&forced);
    assert!(stdout.contains("+5511999999999: enviado"));
    assert_eq!(ws.log_lines().len(), 1);
}

#[cfg(unix)]
#[test]
fn dry_run_does_not_block_a_later_real_send() {
    let ws = Workspace::new();
    let args = ["send", "--message", "Ola!", "--number", "11999999999"];
    let mut dry = args.to_vec();
    dry.push("--dry-run");
    ws.run(&dry);
    assert!(ws.log_lines().is_empty());

    ws.use_silent_delivery();
    let report = ws.run_json(&args);
    assert_eq!(report["sent"][0], "+5511999999999");
    let lines = ws.log_lines();
    assert_eq!(lines.len(), 1);
    assert_eq!(lines[0]["numero"], "+5511999999999");
    assert_eq!(lines[0]["msg_hash"], report["message_hash"]);
}

#[cfg(unix)]
#[test]
fn rerun_skips_logged_numbers_until_forced() {
    let ws = Workspace::new();
    ws.use_silent_delivery();
    let args = ["send", "--message", "Ola!", "--number", "11999999999"];
    ws.run(&args);
    assert_eq!(ws.log_lines().len(), 1);

    let second = ws.run(&args);
    assert!(second.contains("+5511999999999: pulado: log_local"));
    assert_eq!(ws.log_lines().len(), 1);

    let mut forced = args.to_vec();
    forced.push("--force-resend");
    let third = ws.run(&forced);
    assert!(third.contains("+5511999999999: enviado"));
    assert_eq!(ws.log_lines().len(), 2);
}

#[test]
fn history_file_suppresses_sends_unless_ignored() {
    let ws = Workspace::new();
    fs::write(
        ws.path("PyWhatKit_DB.txt"),
        "Date: 2024-01-01\nPhone Number: +5511999999999\nMessage: oi\n",
    )
    .expect("write history");
    let args = ["send", "--dry-run", "--message", "Ola!", "--number", "11999999999"];

    let first = ws.run(&args);
    assert!(first.contains("pulado: historico_pywhatkit"));

    let mut ignoring = args.to_vec();
    ignoring.push("--ignore-history");
    let second = ws.run(&ignoring);
    assert!(second.contains("+5511999999999: enviado"));
}

#[test]
fn batch_reads_roster_and_message_files() {
    let ws = Workspace::new();
    fs::create_dir_all(ws.path("dados")).expect("dados dir");
    fs::create_dir_all(ws.path("mensagens")).expect("mensagens dir");
    fs::write(
        ws.path("dados/clientes.csv"),
        "\u{feff}numero\n11999999999\n21988887777\n",
    )
    .expect("write roster");
    fs::write(
        ws.path("mensagens/mensagem_padrao.txt"),
        "  Promocao de hoje!  \n",
    )
    .expect("write message");

    let stdout = ws.run(&["send", "--dry-run"]);
    assert!(stdout.contains("+5511999999999: enviado"));
    assert!(stdout.contains("+5521988887777: enviado"));
    assert!(stdout.contains("Sent 2, skipped 0, failed 0"));
}

#[test]
fn missing_message_file_is_invalid_input() {
    let ws = Workspace::new();
    let output = ws.output(&[
        "send",
        "--dry-run",
        "--number",
        "11999999999",
        "--message-file",
        "nope.txt",
    ]);
    assert_eq!(output.status.code(), Some(3));
    let stderr = String::from_utf8(output.stderr).expect("utf8");
    assert!(stderr.contains("load message nope.txt"));
}

#[test]
fn blank_inline_message_is_invalid_input() {
    let ws = Workspace::new();
    let output = ws.output(&["send", "--dry-run", "--number", "11999999999", "--message", "  "]);
    assert_eq!(output.status.code(), Some(3));
}

#[test]
fn send_without_delivery_program_is_invalid_input() {
    let ws = Workspace::new();
    let output = ws.output(&["send", "--number", "11999999999", "--message", "Ola!"]);
    assert_eq!(output.status.code(), Some(3));
    let stderr = String::from_utf8(output.stderr).expect("utf8");
    assert!(stderr.contains("no delivery program configured"));
    assert!(stderr.contains("--dry-run"));
    assert!(ws.log_lines().is_empty());
}

#[test]
fn send_with_only_invalid_numbers_is_invalid_input() {
    let ws = Workspace::new();
    let output = ws.output(&["send", "--dry-run", "--message", "Ola!", "--number", "abc"]);
    assert_eq!(output.status.code(), Some(3));
}

#[test]
fn send_one_dry_run_ignores_log_and_writes_nothing() {
    let ws = Workspace::new();
    ws.write_log(&["+5511999999999"]);

    let report = ws.run_json(&["send-one", "11999999999", "--dry-run", "--message", "Ola!"]);
    assert_eq!(report["outcome"], "enviado");
    assert_eq!(report["dry_run"], true);
    assert_eq!(ws.log_lines().len(), 1);
}

#[cfg(unix)]
#[test]
fn send_one_records_unless_told_not_to() {
    let ws = Workspace::new();
    ws.use_silent_delivery();

    ws.run(&["send-one", "11999999999", "--no-record", "--message", "Ola!"]);
    assert!(ws.log_lines().is_empty());

    ws.run(&["send-one", "11999999999", "--message", "Ola!"]);
    ws.run(&["send-one", "11999999999", "--message", "Ola!"]);
    assert_eq!(ws.log_lines().len(), 2);
}

#[test]
fn send_one_rejects_invalid_number() {
    let ws = Workspace::new();
    let output = ws.output(&["send-one", "999", "--dry-run", "--message", "Ola!"]);
    assert_eq!(output.status.code(), Some(3));
}

#[test]
fn log_list_and_check_report_records() {
    let ws = Workspace::new();
    ws.write_log(&["+5511999999999"]);

    let records = ws.run_json(&["log", "list"]);
    assert_eq!(records.as_array().expect("array").len(), 1);
    assert_eq!(records[0]["numero"], "+5511999999999");

    let check = ws.run_json(&["log", "check", "(11) 99999-9999"]);
    assert_eq!(check["logged"], true);
    let check = ws.run_json(&["log", "check", "21988887777"]);
    assert_eq!(check["logged"], false);
}

#[test]
fn defaults_reflect_config_and_clamping() {
    let ws = Workspace::new();
    ws.write_config("[timing]\nwait_seconds = 2\ninterval_seconds = 20\n[delivery]\nprogram = \"helper\"\n");

    let report = ws.run_json(&["defaults"]);
    assert_eq!(report["wait_seconds"], 5);
    assert_eq!(report["interval_seconds"], 20);
    assert_eq!(report["delivery_program"], "helper");
    assert!(report["message"].is_null());
    assert!(report["message_error"]
        .as_str()
        .expect("message error")
        .contains("message file not found"));
}

#[cfg(unix)]
#[test]
fn failed_delivery_is_reported_without_failing_the_batch() {
    let ws = Workspace::new();
    ws.write_config(
        "[delivery]\nprogram = \"sh\"\nargs = [\"-c\", \"echo 'no browser' >&2; exit 1\"]\n",
    );

    let report = ws.run_json(&["send", "--message", "Ola!", "--number", "11999999999"]);
    assert_eq!(report["failed"][0]["number"], "+5511999999999");
    assert!(report["results"][0]["outcome"]
        .as_str()
        .expect("outcome")
        .starts_with("erro: "));
    assert!(ws.log_lines().is_empty());
}

#[cfg(unix)]
#[test]
fn command_delivery_receives_number_and_message() {
    let ws = Workspace::new();
    let capture = ws.path("capture.txt");
    ws.write_config(&format!(
        "[delivery]\nprogram = \"sh\"\nargs = [\"-c\", \"printf '%s|%s' \\\"$1\\\" \\\"$2\\\" > {}\", \"sh\", \"{{number}}\", \"{{message}}\"]\n",
        capture.display()
    ));

    ws.run(&["send", "--message", "Ola, tudo bem?", "--number", "11999999999"]);

    let captured = fs::read_to_string(&capture).expect("capture");
    assert_eq!(captured, "+5511999999999|Ola, tudo bem?");
    assert_eq!(ws.log_lines().len(), 1);
}

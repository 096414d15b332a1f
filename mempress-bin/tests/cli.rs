use std::fs;
use std::process::{Command, Output, Stdio};

fn mempress(args: &[&str]) -> anyhow::Result<Output> {
    Ok(Command::new(env!("CARGO_BIN_EXE_mempress"))
        .args(args)
        .env("RUST_LOG", "off")
        .stdin(Stdio::null())
        .output()?)
}

fn assert_usage_error(args: &[&str]) -> anyhow::Result<()> {
    let output = mempress(args)?;
    assert_eq!(output.status.code(), Some(1), "args {:?}", args);
    assert!(output.stdout.is_empty(), "args {:?} allocated", args);
    Ok(())
}

#[test]
fn test_missing_arguments() -> anyhow::Result<()> {
    assert_usage_error(&[])?;
    assert_usage_error(&["commit"])?;
    Ok(())
}

#[test]
fn test_zero_or_invalid_amount() -> anyhow::Result<()> {
    assert_usage_error(&["commit", "0", "--no-pause"])?;
    assert_usage_error(&["nppool", "0", "--no-pause"])?;
    assert_usage_error(&["commit", "lots", "--no-pause"])?;
    assert_usage_error(&["commit", "-3", "--no-pause"])?;
    Ok(())
}

#[test]
fn test_unknown_strategy() -> anyhow::Result<()> {
    assert_usage_error(&["hog", "1", "--no-pause"])?;
    assert_usage_error(&["COMMIT", "1", "--no-pause"])?;
    let output = mempress(&["hog", "1", "--no-pause"])?;
    assert!(String::from_utf8(output.stderr)?.contains("unknown strategy `hog`"));
    Ok(())
}

#[test]
fn test_help_succeeds() -> anyhow::Result<()> {
    let output = mempress(&["--help"])?;
    assert_eq!(output.status.code(), Some(0));
    let stdout = String::from_utf8(output.stdout)?;
    assert!(stdout.contains("shareable_touch"));
    assert!(stdout.contains("/proc/sys/fs/aio-max-nr"), "{}", stdout);
    Ok(())
}

#[test]
fn test_allocation_reports_address() -> anyhow::Result<()> {
    for strategy in ["reserve", "commit", "commit_touch", "unusable"] {
        let output = mempress(&[strategy, "1", "--no-pause"])?;
        assert_eq!(output.status.code(), Some(0), "{}", strategy);
        let stdout = String::from_utf8(output.stdout)?;
        assert!(stdout.contains("Allocated at address 0x"), "{}", stdout);
    }
    Ok(())
}

#[test]
fn test_nppool_reports_sentinel() -> anyhow::Result<()> {
    let output = mempress(&["nppool", "4", "--no-pause"])?;
    assert_eq!(output.status.code(), Some(0));
    assert_eq!(String::from_utf8(output.stdout)?, "Allocated at address 0x1\n");
    Ok(())
}

#[test]
fn test_failure_still_exits_zero() -> anyhow::Result<()> {
    let output = mempress(&["pool", "5", "--no-pause"])?;
    assert_eq!(output.status.code(), Some(0));
    assert!(output.stdout.is_empty());
    assert!(String::from_utf8(output.stderr)?.contains("*** Allocation failed"));

    let output = mempress(&["nppool", "1", "--no-pause", "--read-target", "/nonexistent/file"])?;
    assert_eq!(output.status.code(), Some(0));
    assert!(String::from_utf8(output.stderr)?.contains("*** Allocation failed"));
    Ok(())
}

#[test]
fn test_pauses_return_on_closed_stdin() -> anyhow::Result<()> {
    let output = mempress(&["commit", "1"])?;
    assert_eq!(output.status.code(), Some(0));
    let stdout = String::from_utf8(output.stdout)?;
    let start = stdout.find("Press ENTER to start").expect("start prompt");
    let address = stdout.find("Allocated at address").expect("address");
    let exit = stdout.find("Press ENTER to exit").expect("exit prompt");
    assert!(start < address && address < exit);
    Ok(())
}

#[test]
fn test_shareable_section_removed_on_exit() -> anyhow::Result<()> {
    let name = format!("/mempress-cli-{:016x}", rand::random::<u64>());
    let output = mempress(&["shareable_touch", "2", "--no-pause", "--section-name", &name])?;
    assert_eq!(output.status.code(), Some(0));
    assert!(String::from_utf8(output.stdout)?.contains("Allocated at address 0x"));
    assert!(fs::metadata(format!("/dev/shm{}", name)).is_err());
    Ok(())
}

#[test]
fn test_shareable_existing_section_kept() -> anyhow::Result<()> {
    let name = format!("/mempress-cli-{:016x}", rand::random::<u64>());
    let path = format!("/dev/shm{}", name);
    fs::File::create(&path)?;
    let output = mempress(&["shareable", "2", "--no-pause", "--section-name", &name])?;
    assert_eq!(output.status.code(), Some(0));
    assert_eq!(fs::metadata(&path)?.len(), 2 * 1024 * 1024);
    fs::remove_file(&path)?;
    Ok(())
}

use anyhow::Result;

use crate::CliTest;

#[test]
fn lists_properties_files() -> Result<()> {
    let test = CliTest::new()?;
    test.write_file("a/locales/en-US/app.properties", "greet=Hello\n")?;
    test.write_file("b/locales/en-US/prefs.properties", "title=Prefs\n")?;
    test.write_file("a/content/main.js", "function f() {}\n")?;

    let output = test.list_command().output()?;
    let stdout = String::from_utf8_lossy(&output.stdout);

    assert_eq!(output.status.code(), Some(0));
    assert!(stdout.contains("app.properties"));
    assert!(stdout.contains("prefs.properties"));
    assert!(!stdout.contains("main.js"));
    Ok(())
}

#[test]
fn counts_bucket_messages_by_placeholders() -> Result<()> {
    let test = CliTest::new()?;
    test.write_file(
        "locales/en-US/app.properties",
        "plain=Hello\none=Hi %S\ntwo=%1$S and %2$S\nanother=Bye %S\n",
    )?;

    let output = test.list_command().arg("--counts").output()?;
    let stdout = String::from_utf8_lossy(&output.stdout);

    assert_eq!(output.status.code(), Some(0));
    assert!(stdout.contains("4 message(s)"), "stdout: {stdout}");
    assert!(stdout.contains("1 with 0 var(s)"));
    assert!(stdout.contains("2 with 1 var(s)"));
    assert!(stdout.contains("1 with 2 var(s)"));
    Ok(())
}

#[test]
fn empty_tree_prints_a_notice() -> Result<()> {
    let test = CliTest::new()?;
    let output = test.list_command().output()?;
    let stdout = String::from_utf8_lossy(&output.stdout);

    assert_eq!(output.status.code(), Some(0));
    assert!(stdout.contains("No .properties files found."));
    Ok(())
}

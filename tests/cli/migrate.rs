use anyhow::Result;

use crate::CliTest;

const DIRECTIVE_BUNDLE: &str = "\
# FTL path: app/app.ftl
# FTL prefix: app

greet=Hello %S
greet.tooltip=Info
";

#[test]
fn migrates_a_properties_file_with_directives() -> Result<()> {
    let test = CliTest::new()?;
    test.write_file("locales/en-US/app.properties", DIRECTIVE_BUNDLE)?;

    let output = test
        .migrate_command()
        .arg("locales/en-US/app.properties")
        .output()?;
    let stdout = String::from_utf8_lossy(&output.stdout);

    assert_eq!(output.status.code(), Some(0), "stdout: {stdout}");
    assert!(stdout.contains("Migrated 2 message(s), 0 bundle reference(s)"));
    assert!(stdout.contains("from locales/en-US/app.properties"));
    assert!(stdout.contains("to   locales/en-US/app/app.ftl"));

    let ftl = test.read_file("locales/en-US/app/app.ftl")?;
    assert!(ftl.contains("Mozilla Public"));
    assert!(ftl.contains("app-greet = Hello { $var1 }"));
    assert!(ftl.contains("    .tooltip = Info"));

    // Fully migrated, so the legacy file is gone.
    assert!(!test.has_file("locales/en-US/app.properties"));
    Ok(())
}

#[test]
fn cli_flags_supply_missing_metadata() -> Result<()> {
    let test = CliTest::new()?;
    test.write_file("locales/en-US/app.properties", "greet=Hello\n")?;

    let output = test
        .migrate_command()
        .arg("locales/en-US/app.properties")
        .arg("--ftl-path")
        .arg("app/app.ftl")
        .arg("--ftl-prefix")
        .arg("app")
        .output()?;

    assert_eq!(output.status.code(), Some(0));
    let ftl = test.read_file("locales/en-US/app/app.ftl")?;
    assert!(ftl.contains("app-greet = Hello"));
    Ok(())
}

#[test]
fn missing_ftl_target_is_an_error() -> Result<()> {
    let test = CliTest::new()?;
    test.write_file("locales/en-US/app.properties", "greet=Hello\n")?;

    let output = test
        .migrate_command()
        .arg("locales/en-US/app.properties")
        .output()?;
    let stderr = String::from_utf8_lossy(&output.stderr);

    assert_eq!(output.status.code(), Some(2));
    assert!(stderr.contains("has no FTL target"), "stderr: {stderr}");
    Ok(())
}

#[test]
fn dry_run_reports_without_writing() -> Result<()> {
    let test = CliTest::new()?;
    test.write_file("locales/en-US/app.properties", DIRECTIVE_BUNDLE)?;

    let output = test
        .migrate_command()
        .arg("locales/en-US/app.properties")
        .arg("--dry-run")
        .output()?;
    let stdout = String::from_utf8_lossy(&output.stdout);

    assert_eq!(output.status.code(), Some(0));
    assert!(stdout.contains("Would migrate 2 message(s)"));
    assert_eq!(
        test.read_file("locales/en-US/app.properties")?,
        DIRECTIVE_BUNDLE
    );
    assert!(!test.has_file("locales/en-US/app/app.ftl"));
    Ok(())
}

#[test]
fn bug_number_writes_migration_recipe() -> Result<()> {
    let test = CliTest::new()?;
    test.write_file("locales/en-US/app.properties", DIRECTIVE_BUNDLE)?;

    let output = test
        .migrate_command()
        .arg("locales/en-US/app.properties")
        .arg("--bug")
        .arg("1900000")
        .output()?;
    let stdout = String::from_utf8_lossy(&output.stdout);

    assert_eq!(output.status.code(), Some(0));
    assert!(stdout.contains("with migration recipe"));

    let recipe = test.read_file("python/l10n/fluent_migrations/bug_1900000_app.py")?;
    assert!(recipe.contains("Bug 1900000"));
    assert!(recipe.contains(r#"REPLACE(source, "greet""#));
    assert!(recipe.contains(r#"COPY(source, "greet.tooltip")"#));
    Ok(())
}

#[test]
fn plural_flag_selects_a_variant_pattern() -> Result<()> {
    let test = CliTest::new()?;
    test.write_file(
        "locales/en-US/app.properties",
        "# FTL path: app/app.ftl\n# FTL prefix: app\n\nfiles=one file;%S files\n",
    )?;

    let output = test
        .migrate_command()
        .arg("locales/en-US/app.properties")
        .arg("--plural")
        .arg("files=count")
        .output()?;

    assert_eq!(output.status.code(), Some(0));
    let ftl = test.read_file("locales/en-US/app/app.ftl")?;
    assert!(ftl.contains("$count ->"), "ftl: {ftl}");
    assert!(ftl.contains("[one] one file"));
    assert!(ftl.contains("*[other] { $count } files"));
    Ok(())
}

#[test]
fn rewrites_js_call_sites_end_to_end() -> Result<()> {
    let test = CliTest::new()?;
    test.write_file(
        "app/locales/en-US/app.properties",
        "# FTL path: app.ftl\n# FTL prefix: app\n\ngreet=Hello %S\n",
    )?;
    test.write_file(
        "app/content/main.js",
        "\
const bundle = Services.strings.createBundle(\"chrome://app/locale/app.properties\");

function getGreeting(name) {
  return bundle.formatStringFromName(\"greet\", [name]);
}
",
    )?;

    let output = test
        .migrate_command()
        .arg("app/content/main.js")
        .output()?;
    let stdout = String::from_utf8_lossy(&output.stdout);

    assert_eq!(output.status.code(), Some(0), "stdout: {stdout}");
    assert!(stdout.contains("Migrated 1 message(s), 1 bundle reference(s)"));

    assert_eq!(
        test.read_file("app/content/main.js")?,
        "\
const bundle = new Localization([\"app.ftl\"], true);

function getGreeting(name) {
  return bundle.formatValueSync(\"app-greet\", { var1: name });
}
"
    );
    let ftl = test.read_file("app/locales/en-US/app.ftl")?;
    assert!(ftl.contains("app-greet = Hello { $var1 }"));
    assert!(!test.has_file("app/locales/en-US/app.properties"));
    Ok(())
}

#[test]
fn unreferenced_messages_stay_in_the_properties_file() -> Result<()> {
    let test = CliTest::new()?;
    test.write_file(
        "app/locales/en-US/app.properties",
        "# FTL path: app.ftl\n# FTL prefix: app\n\ngreet=Hello\nother=Untouched\n",
    )?;
    test.write_file(
        "app/content/main.js",
        "\
const bundle = Services.strings.createBundle(\"chrome://app/locale/app.properties\");

function f() {
  return bundle.GetStringFromName(\"greet\");
}
",
    )?;

    let output = test
        .migrate_command()
        .arg("app/content/main.js")
        .output()?;

    assert_eq!(output.status.code(), Some(0));
    assert_eq!(
        test.read_file("app/locales/en-US/app.properties")?,
        "# FTL path: app.ftl\n# FTL prefix: app\n\nother=Untouched\n"
    );
    let ftl = test.read_file("app/locales/en-US/app.ftl")?;
    assert!(ftl.contains("app-greet = Hello"));
    assert!(!ftl.contains("Untouched"));
    Ok(())
}

#[test]
fn flagged_call_sites_fail_the_run() -> Result<()> {
    let test = CliTest::new()?;
    test.write_file(
        "app/locales/en-US/app.properties",
        "# FTL path: app.ftl\n# FTL prefix: app\n\ngreet=Hello\n",
    )?;
    test.write_file(
        "app/content/main.js",
        "\
const bundle = Services.strings.createBundle(\"chrome://app/locale/app.properties\");

function lookup(key) {
  return bundle.GetStringFromName(key);
}
",
    )?;

    let output = test
        .migrate_command()
        .arg("app/content/main.js")
        .output()?;
    let stdout = String::from_utf8_lossy(&output.stdout);

    assert_eq!(output.status.code(), Some(1), "stdout: {stdout}");
    assert!(stdout.contains("Manual work needed at or near line(s): 4"));

    let js = test.read_file("app/content/main.js")?;
    assert!(js.contains("GetStringFromName(/* L10N-FIXME */ key)"));
    assert!(js.contains("new Localization([\"app.ftl\"])"));

    // Nothing was resolved to migrate, so the bundle stays put.
    assert!(test.has_file("app/locales/en-US/app.properties"));
    Ok(())
}

#[test]
fn stringbundle_tags_are_removed_from_documents() -> Result<()> {
    let test = CliTest::new()?;
    test.write_file(
        "app/locales/en-US/app.properties",
        "# FTL path: app.ftl\n# FTL prefix: app\n\ngreet=Hello\n",
    )?;
    test.write_file(
        "app/content/dialog.xhtml",
        "<dialog>\n  <stringbundle id=\"strings\" src=\"chrome://app/locale/app.properties\"/>\n</dialog>\n",
    )?;
    test.write_file(
        "app/content/dialog.js",
        "\
const DIALOG_URI = \"chrome://app/content/dialog.xhtml\";

function show(strings) {
  return strings.GetStringFromName(\"greet\");
}
",
    )?;

    let output = test
        .migrate_command()
        .arg("app/content/dialog.js")
        .output()?;
    let stdout = String::from_utf8_lossy(&output.stdout);

    assert_eq!(output.status.code(), Some(0), "stdout: {stdout}");
    assert_eq!(
        test.read_file("app/content/dialog.xhtml")?,
        "<dialog>\n</dialog>\n"
    );
    let js = test.read_file("app/content/dialog.js")?;
    assert!(js.contains("strings.formatValueSync(\"app-greet\")"));
    assert!(test.has_file("app/locales/en-US/app.ftl"));
    Ok(())
}

#[test]
fn js_without_bundle_references_is_an_error() -> Result<()> {
    let test = CliTest::new()?;
    test.write_file("app/content/main.js", "function f() {}\n")?;

    let output = test
        .migrate_command()
        .arg("app/content/main.js")
        .output()?;
    let stderr = String::from_utf8_lossy(&output.stderr);

    assert_eq!(output.status.code(), Some(2));
    assert!(
        stderr.contains("No .properties bundles resolved"),
        "stderr: {stderr}"
    );
    Ok(())
}

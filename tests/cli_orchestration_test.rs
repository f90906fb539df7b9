use auto_package::cli::orchestration::{apply_overrides, discover_context, TriggerArgs};
use auto_package::config::Config;
use auto_package::domain::ReleaseConfig;
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

#[test]
fn test_trigger_args_default_is_passive() {
    let args = TriggerArgs::default();
    assert_eq!(args.solution, None);
    assert_eq!(args.project, None);
    assert_eq!(args.sign_tool, None);
    assert!(!args.open_artifacts);
    assert!(!args.upload);
}

#[test]
fn test_discovered_context_resolves_default_layout() {
    let dir = TempDir::new().unwrap();
    let src = dir.path().join("src");
    fs::create_dir_all(src.join("Recorder")).unwrap();
    fs::write(src.join("Recorder.sln"), "").unwrap();

    let context = discover_context(None, Some(Path::new("Recorder")), &src).unwrap();
    let release = ReleaseConfig::resolve(&context, &Config::default()).unwrap();

    assert_eq!(release.package_root, dir.path());
    assert_eq!(
        release.metadata_path,
        src.join("Recorder").join("Properties/AssemblyInfo.cs")
    );
    assert_eq!(
        release.script_template_path,
        dir.path().join("package/ProVersion/IssFiles/version.iss")
    );
}

#[test]
fn test_overrides_flow_into_release_config() {
    let dir = TempDir::new().unwrap();
    fs::write(dir.path().join("App.sln"), "").unwrap();

    let args = TriggerArgs {
        sign_tool: Some(PathBuf::from("/opt/sign")),
        upload: true,
        ..TriggerArgs::default()
    };
    let config = apply_overrides(Config::default(), &args);
    let context = discover_context(None, None, dir.path()).unwrap();
    let release = ReleaseConfig::resolve(&context, &config).unwrap();

    assert_eq!(release.sign_tool_path, Some(PathBuf::from("/opt/sign")));
    assert!(release.upload_to_web);
    assert!(!release.open_artifact_folder);
}

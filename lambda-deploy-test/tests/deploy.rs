//! End-to-end deploy tests against the in-memory registry

use std::collections::HashMap;
use std::io::Read;
use std::sync::Arc;

use bytes::Bytes;
use lambda_deploy_core::{ConfigSource, Settings};
use lambda_deploy_lambda::{DeployError, DeployService};
use lambda_deploy_package::{PackageError, Packager};
use lambda_deploy_test::{
    init_tracing, FakeInstaller, FakeRegistry, LambdaTree, RegistryCall, TEST_ROLE,
};

fn settings() -> Settings {
    Settings {
        role: Some(TEST_ROLE.to_string()),
        ..Default::default()
    }
}

fn service(
    tree: &LambdaTree,
    registry: Arc<FakeRegistry>,
    installer: Arc<FakeInstaller>,
    settings: Settings,
    vars: &[(&str, &str)],
) -> DeployService {
    let process = vars
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect();
    let source = Arc::new(ConfigSource::new(process, HashMap::new()));
    let packager = Arc::new(Packager::new(installer, source));
    DeployService::new(registry, packager, tree.path(), settings)
}

fn zip_entries(zip_file: &Bytes) -> HashMap<String, String> {
    let mut archive = zip::ZipArchive::new(std::io::Cursor::new(zip_file.to_vec())).unwrap();
    let mut entries = HashMap::new();
    for i in 0..archive.len() {
        let mut file = archive.by_index(i).unwrap();
        let mut contents = String::new();
        file.read_to_string(&mut contents).unwrap();
        entries.insert(file.name().to_string(), contents);
    }
    entries
}

fn names(list: &[&str]) -> Vec<String> {
    list.iter().map(|s| s.to_string()).collect()
}

#[tokio::test]
async fn test_missing_role_fails_before_any_call() {
    init_tracing();
    let tree = LambdaTree::new().lambda("foo", &[("lambda_function.py", "")]);
    let registry = Arc::new(FakeRegistry::new());
    let installer = Arc::new(FakeInstaller::new());

    let deployer = service(&tree, registry.clone(), installer, Settings::default(), &[]);
    let result = deployer.deploy(&[]).await;

    assert!(matches!(result, Err(DeployError::Arguments(_))));
    assert!(result.unwrap_err().is_arguments());
    assert!(registry.calls().is_empty());
}

#[tokio::test]
async fn test_update_existing_and_create_new() {
    init_tracing();
    let tree = LambdaTree::new()
        .lambda("foo", &[("lambda_function.py", "def lambda_handler(e, c): pass")])
        .lambda("bar", &[("lambda_function.py", "def lambda_handler(e, c): pass")]);
    let registry = Arc::new(FakeRegistry::with_functions(&["foo"]));
    let installer = Arc::new(FakeInstaller::new());

    let deployer = service(&tree, registry.clone(), installer, settings(), &[]);
    let report = deployer.deploy(&names(&["foo", "bar"])).await.unwrap();

    let uploads = registry.uploads();
    assert_eq!(uploads.len(), 2);
    assert!(matches!(
        &uploads[0],
        RegistryCall::Update { function_name, publish: true, .. } if function_name == "foo"
    ));
    assert!(matches!(
        &uploads[1],
        RegistryCall::Create { function_name, publish: true, .. } if function_name == "bar"
    ));

    assert_eq!(
        report.deployed,
        vec![
            ("foo".to_string(), Some("2".to_string())),
            ("bar".to_string(), Some("1".to_string())),
        ]
    );
    assert!(report.failed.is_empty());
    assert!(report.missing.is_empty());
}

#[tokio::test]
async fn test_no_names_deploys_every_directory() {
    init_tracing();
    let tree = LambdaTree::new()
        .lambda("gamma", &[("app.py", "")])
        .lambda("alpha", &[("app.py", "")])
        .lambda("beta", &[("app.py", "")])
        .file("README.md", "not a lambda");
    let registry = Arc::new(FakeRegistry::new());
    let installer = Arc::new(FakeInstaller::new());

    let deployer = service(&tree, registry.clone(), installer, settings(), &[]);
    let report = deployer.deploy(&[]).await.unwrap();

    let uploaded: Vec<String> = registry
        .uploads()
        .iter()
        .filter_map(|call| call.function_name().map(str::to_string))
        .collect();
    assert_eq!(uploaded, names(&["alpha", "beta", "gamma"]));
    assert_eq!(report.deployed.len(), 3);
    assert_eq!(registry.function_names_now(), names(&["alpha", "beta", "gamma"]));
}

#[tokio::test]
async fn test_missing_name_is_skipped() {
    init_tracing();
    let tree = LambdaTree::new().lambda("foo", &[("app.py", "")]);
    let registry = Arc::new(FakeRegistry::new());
    let installer = Arc::new(FakeInstaller::new());

    let deployer = service(&tree, registry.clone(), installer, settings(), &[]);
    let report = deployer.deploy(&names(&["ghost", "foo"])).await.unwrap();

    assert_eq!(report.missing, names(&["ghost"]));
    assert_eq!(report.deployed.len(), 1);
    assert!(registry
        .uploads()
        .iter()
        .all(|call| call.function_name() != Some("ghost")));
}

#[tokio::test]
async fn test_repeated_names_deploy_once_in_order() {
    init_tracing();
    let tree = LambdaTree::new()
        .lambda("alpha", &[("app.py", "")])
        .lambda("beta", &[("app.py", "")]);
    let registry = Arc::new(FakeRegistry::new());
    let installer = Arc::new(FakeInstaller::new());

    let deployer = service(&tree, registry.clone(), installer, settings(), &[]);
    let report = deployer
        .deploy(&names(&["beta", "alpha", "beta", "ghost", "ghost"]))
        .await
        .unwrap();

    let uploaded: Vec<String> = registry
        .uploads()
        .iter()
        .filter_map(|call| call.function_name().map(str::to_string))
        .collect();
    assert_eq!(uploaded, names(&["beta", "alpha"]));
    assert_eq!(
        report.deployed,
        vec![
            ("beta".to_string(), Some("1".to_string())),
            ("alpha".to_string(), Some("1".to_string())),
        ]
    );
    assert_eq!(report.missing, names(&["ghost"]));
}

#[tokio::test]
async fn test_rejected_target_does_not_stop_siblings() {
    init_tracing();
    let tree = LambdaTree::new()
        .lambda("alpha", &[("app.py", "")])
        .lambda("beta", &[("app.py", "")])
        .lambda("gamma", &[("app.py", "")]);
    let registry = Arc::new(FakeRegistry::new().reject("beta"));
    let installer = Arc::new(FakeInstaller::new());

    let deployer = service(&tree, registry.clone(), installer, settings(), &[]);
    let report = deployer.deploy(&[]).await.unwrap();

    assert_eq!(report.failed, names(&["beta"]));
    let deployed: Vec<&str> = report.deployed.iter().map(|(n, _)| n.as_str()).collect();
    assert_eq!(deployed, vec!["alpha", "gamma"]);
    assert_eq!(registry.uploads().len(), 3);
}

#[tokio::test]
async fn test_unreachable_registry_fails_each_target() {
    init_tracing();
    let tree = LambdaTree::new()
        .lambda("alpha", &[("app.py", "")])
        .lambda("beta", &[("app.py", "")]);
    let registry = Arc::new(FakeRegistry::new().unreachable());
    let installer = Arc::new(FakeInstaller::new());

    let deployer = service(&tree, registry.clone(), installer, settings(), &[]);
    let report = deployer.deploy(&[]).await.unwrap();

    assert_eq!(report.failed, names(&["alpha", "beta"]));
    assert!(report.deployed.is_empty());
}

#[tokio::test]
async fn test_installer_failure_stops_the_run() {
    init_tracing();
    let tree = LambdaTree::new()
        .lambda("alpha", &[("app.py", ""), ("requirements.txt", "requests\n")])
        .lambda("beta", &[("app.py", "")]);
    let registry = Arc::new(FakeRegistry::new());
    let installer = Arc::new(FakeInstaller::failing());

    let deployer = service(&tree, registry.clone(), installer.clone(), settings(), &[]);
    let result = deployer.deploy(&[]).await;

    match result {
        Err(DeployError::Package(PackageError::DependencyInstallation { name, .. })) => {
            assert_eq!(name, "alpha");
        }
        other => panic!("expected dependency installation error, got {:?}", other),
    }

    assert!(registry.calls().is_empty(), "nothing is uploaded");
    let staging = installer.staging_dirs();
    assert_eq!(staging.len(), 1);
    assert!(!staging[0].exists(), "staging directory should be removed");
}

#[tokio::test]
async fn test_create_carries_metadata_and_archive() {
    init_tracing();
    let tree = LambdaTree::new().lambda(
        "bar",
        &[
            ("lambda_function.py", "def lambda_handler(e, c): pass"),
            ("lambda_function.pyc", "compiled"),
            (".env", "SECRET = do-not-ship"),
            ("requirements.txt", "requests\n"),
        ],
    );
    let registry = Arc::new(FakeRegistry::new());
    let installer = Arc::new(
        FakeInstaller::new()
            .file("requests/__init__.py", "# vendored")
            .file("requests-2.31.0.dist-info/METADATA", "Name: requests"),
    );
    let settings = Settings {
        env_vars: names(&["STAGE", "DB_HOST"]),
        timeout: 30,
        memory_size: 256,
        ..settings()
    };

    let deployer = service(
        &tree,
        registry.clone(),
        installer.clone(),
        settings,
        &[("STAGE", "prod"), ("DB_HOST", "db.internal")],
    );
    deployer.deploy(&[]).await.unwrap();

    let uploads = registry.uploads();
    let RegistryCall::Create {
        function_name,
        runtime,
        role,
        handler,
        description,
        timeout,
        memory_size,
        publish,
        zip_file,
    } = &uploads[0]
    else {
        panic!("expected a create call, got {:?}", uploads);
    };

    assert_eq!(function_name, "bar");
    assert_eq!(runtime, "python3.12");
    assert_eq!(role, TEST_ROLE);
    assert_eq!(handler, "lambda_function.lambda_handler");
    assert_eq!(description, "Lambda code for bar");
    assert_eq!(*timeout, 30);
    assert_eq!(*memory_size, 256);
    assert!(*publish);

    let entries = zip_entries(zip_file);
    assert_eq!(entries[".env"], "STAGE = prod\nDB_HOST = db.internal");
    assert!(entries.contains_key("lambda_function.py"));
    assert!(entries.contains_key("requirements.txt"));
    assert!(!entries.contains_key("lambda_function.pyc"));
    assert_eq!(entries["requests/__init__.py"], "# vendored");
    assert!(entries.contains_key("requests-2.31.0.dist-info/METADATA"));

    assert!(installer.staging_dirs().iter().all(|dir| !dir.exists()));
}

#[tokio::test]
async fn test_list_returns_registry_records() {
    init_tracing();
    let tree = LambdaTree::new();
    let registry = Arc::new(FakeRegistry::with_functions(&["alpha", "beta"]));
    let installer = Arc::new(FakeInstaller::new());

    let deployer = service(&tree, registry.clone(), installer, Settings::default(), &[]);
    let functions = deployer.list().await.unwrap();

    let listed: Vec<&str> = functions.iter().map(|f| f.function_name.as_str()).collect();
    assert_eq!(listed, vec!["alpha", "beta"]);
    assert_eq!(registry.calls(), vec![RegistryCall::List]);
}

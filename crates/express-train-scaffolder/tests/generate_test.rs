use express_train_scaffolder::{
    validate, Generator, InstallOutcome, Installer, ProjectOptions, TemplateStore,
};
use std::collections::BTreeSet;
use std::path::Path;
use std::sync::atomic::{AtomicUsize, Ordering};
use walkdir::WalkDir;

#[derive(Default)]
struct CountingInstaller {
    calls: AtomicUsize,
}

impl Installer for CountingInstaller {
    fn command(&self) -> String {
        "count".to_string()
    }

    async fn install(&self, _project_dir: &Path) -> anyhow::Result<()> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }
}

const EXPECTED_DIRS: &[&str] = &[
    "app",
    "app/controllers",
    "app/lib",
    "app/middleware",
    "app/models",
    "app/public",
    "app/views",
    "app/views/partials",
    "app/views/layouts",
    "bin",
    "doc",
    "config",
    "test",
    "log",
];

const EXPECTED_FILES: &[&str] = &[
    "app/index.js",
    "app.js",
    "package.json",
    "config/default.json",
    "app/lib/middleware.js",
    "app/lib/routes.js",
    "app/lib/server.js",
    "app/lib/views.js",
    "app/controllers/HomeController.js",
    "app/views/index.hbs",
    "app/views/partials/css.hbs",
    "app/views/partials/scripts.hbs",
    "app/views/layouts/default.hbs",
];

fn relative_entries(root: &Path, want_dirs: bool) -> BTreeSet<String> {
    WalkDir::new(root)
        .min_depth(1)
        .into_iter()
        .map(|entry| entry.unwrap())
        .filter(|entry| entry.file_type().is_dir() == want_dirs)
        .map(|entry| {
            entry
                .path()
                .strip_prefix(root)
                .unwrap()
                .to_string_lossy()
                .replace('\\', "/")
        })
        .collect()
}

#[tokio::test]
async fn generates_exact_layout_without_installing() {
    let project = tempfile::tempdir().unwrap();
    let store = TemplateStore::embedded();
    let installer = CountingInstaller::default();
    let options = ProjectOptions {
        skip_install: true,
        description: "Generated in a test".to_string(),
        ..ProjectOptions::for_root(project.path().join("trainyard"))
    };

    let spec = validate("2.5.0").unwrap();
    let (report, outcome) = Generator::new(&store)
        .generate(&spec, &options, &installer)
        .await
        .unwrap();

    assert_eq!(outcome, InstallOutcome::Skipped);
    assert_eq!(installer.calls.load(Ordering::SeqCst), 0);
    assert_eq!(report.files.len(), EXPECTED_FILES.len());

    let root = project.path().join("trainyard");
    let files = relative_entries(&root, false);
    let expected: BTreeSet<String> = EXPECTED_FILES.iter().map(|s| s.to_string()).collect();
    assert_eq!(files, expected);

    let dirs = relative_entries(&root, true);
    let expected: BTreeSet<String> = EXPECTED_DIRS.iter().map(|s| s.to_string()).collect();
    assert_eq!(dirs, expected);

    let package = std::fs::read_to_string(root.join("package.json")).unwrap();
    assert!(package.contains("\"name\": \"trainyard\""));
    assert!(package.contains("\"express-train\": \"2.5.0\""));
}

#[tokio::test]
async fn newer_and_older_targets_render_different_code() {
    let store = TemplateStore::embedded();
    let installer = CountingInstaller::default();
    let newer = tempfile::tempdir().unwrap();
    let older = tempfile::tempdir().unwrap();

    for (dir, input) in [(&newer, "2.0.0"), (&older, "3.0.0")] {
        let options = ProjectOptions {
            skip_install: true,
            ..ProjectOptions::for_root(dir.path().to_path_buf())
        };
        Generator::new(&store)
            .generate(&validate(input).unwrap(), &options, &installer)
            .await
            .unwrap();
    }

    let routes = |dir: &tempfile::TempDir| {
        std::fs::read_to_string(dir.path().join("app/lib/routes.js")).unwrap()
    };
    assert!(routes(&newer).contains("function (app, HomeController)"));
    assert!(!routes(&older).contains("function (app, HomeController)"));
}

#[tokio::test]
async fn install_hook_fires_once_when_not_skipped() {
    let project = tempfile::tempdir().unwrap();
    let store = TemplateStore::embedded();
    let installer = CountingInstaller::default();
    let options = ProjectOptions::for_root(project.path().to_path_buf());

    let (_, outcome) = Generator::new(&store)
        .generate(&validate("^2.1.0").unwrap(), &options, &installer)
        .await
        .unwrap();

    assert_eq!(outcome, InstallOutcome::Installed);
    assert_eq!(installer.calls.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn regenerating_into_same_root_succeeds() {
    let project = tempfile::tempdir().unwrap();
    let store = TemplateStore::embedded();
    let installer = CountingInstaller::default();
    let options = ProjectOptions {
        skip_install: true,
        ..ProjectOptions::for_root(project.path().to_path_buf())
    };
    let spec = validate("2.5.0").unwrap();

    Generator::new(&store)
        .generate(&spec, &options, &installer)
        .await
        .unwrap();
    Generator::new(&store)
        .generate(&spec, &options, &installer)
        .await
        .unwrap();

    assert_eq!(relative_entries(project.path(), false).len(), EXPECTED_FILES.len());
}

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

fn fairshare(dir: &TempDir) -> Command {
    let mut cmd = Command::cargo_bin("fairshare").unwrap();
    cmd.env("FAIRSHARE_DATA_DIR", dir.path())
        .env_remove("FAIRSHARE_LOG");
    cmd
}

fn init(dir: &TempDir) {
    fairshare(dir)
        .args(["init", "--partner-x", "Ana", "--partner-y", "Ben"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Ana (X) and Ben (Y)"));
}

#[test]
fn test_config_shows_partners_after_init() {
    let dir = TempDir::new().unwrap();
    init(&dir);

    fairshare(&dir)
        .arg("config")
        .assert()
        .success()
        .stdout(predicate::str::contains("Partner X:       Ana"))
        .stdout(predicate::str::contains("Initialized:     true"));
}

#[test]
fn test_report_uses_income_ratio() {
    let dir = TempDir::new().unwrap();
    init(&dir);

    fairshare(&dir)
        .args(["income", "add", "Ana salary", "-a", "3000", "-p", "X"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Added income: Ana salary (Ana)"));
    fairshare(&dir)
        .args(["income", "add", "Ben salary", "-a", "1000", "-p", "Y"])
        .assert()
        .success();
    fairshare(&dir)
        .args(["expense", "add", "Rent", "-a", "1000"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Monthly: $1000.00"));

    fairshare(&dir)
        .arg("report")
        .assert()
        .success()
        .stdout(predicate::str::contains("Ratio: Ana 75% / Ben 25%"))
        .stdout(predicate::str::contains("Rent"));
}

#[test]
fn test_weekly_expense_is_normalized() {
    let dir = TempDir::new().unwrap();
    init(&dir);

    fairshare(&dir)
        .args(["expense", "add", "Coffee", "-a", "10", "-f", "weekly"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Monthly: $43.30"));
}

#[test]
fn test_benefit_out_of_range_is_rejected() {
    let dir = TempDir::new().unwrap();
    init(&dir);

    fairshare(&dir)
        .args(["expense", "add", "Gym", "-a", "40", "--benefit-x", "150"])
        .assert()
        .failure();

    fairshare(&dir)
        .args(["expense", "list"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Gym").not());
}

#[test]
fn test_in_use_category_needs_reassignment() {
    let dir = TempDir::new().unwrap();
    init(&dir);

    fairshare(&dir).args(["category", "add", "Food"]).assert().success();
    fairshare(&dir).args(["category", "add", "Home"]).assert().success();
    fairshare(&dir)
        .args(["expense", "add", "Groceries", "-a", "400", "-c", "food"])
        .assert()
        .success();

    fairshare(&dir)
        .args(["category", "remove", "Food"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("is used by 1 expense(s)"));

    fairshare(&dir)
        .args(["category", "remove", "Food", "--reassign-to", "Home"])
        .assert()
        .success()
        .stdout(predicate::str::contains("1 expense(s) moved to 'Home'"));

    fairshare(&dir)
        .args(["category", "list"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Food").not());
}

#[test]
fn test_duplicate_category_is_rejected() {
    let dir = TempDir::new().unwrap();
    init(&dir);

    fairshare(&dir).args(["category", "add", "Food"]).assert().success();
    fairshare(&dir)
        .args(["category", "add", " food "])
        .assert()
        .failure();
}

#[test]
fn test_blank_partner_name_is_rejected() {
    let dir = TempDir::new().unwrap();
    init(&dir);

    fairshare(&dir)
        .args(["partners", "  ", "Ben"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Both partner names are required"));

    fairshare(&dir)
        .arg("partners")
        .assert()
        .success()
        .stdout(predicate::str::contains("Partner X: Ana"));
}

#[test]
fn test_json_export_to_stdout() {
    let dir = TempDir::new().unwrap();
    init(&dir);

    fairshare(&dir)
        .args(["expense", "add", "Internet", "-a", "60"])
        .assert()
        .success();

    fairshare(&dir)
        .args(["export", "json"])
        .assert()
        .success()
        .stdout(predicate::str::contains("\"Internet\""));
}

#[test]
fn test_param_on_monthly_expense_is_rejected() {
    let dir = TempDir::new().unwrap();
    init(&dir);

    fairshare(&dir)
        .args(["expense", "add", "Rent", "-a", "900"])
        .assert()
        .success();
    fairshare(&dir)
        .args(["expense", "edit", "Rent", "--every", "3"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("does not take a parameter"));

    fairshare(&dir)
        .args(["expense", "edit", "Rent", "-f", "every_n_months", "--every", "3"])
        .assert()
        .success();
}

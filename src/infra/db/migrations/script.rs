//! Migration scripts and the sources they are discovered from.

use std::borrow::Cow;
use std::cmp::Ordering;
use std::collections::HashSet;

use sea_orm::DbBackend;

use super::MigrationError;

/// Embeds `migrations/<dir>/<name>.sql` files in declaration order.
macro_rules! embedded_scripts {
    ($dir:literal => [$($name:literal),+ $(,)?]) => {
        vec![
            $(
                MigrationScript::new(
                    $name,
                    include_str!(concat!(
                        env!("CARGO_MANIFEST_DIR"),
                        "/migrations/",
                        $dir,
                        "/",
                        $name,
                        ".sql"
                    )),
                )
            ),+
        ]
    };
}

/// Named, immutable unit of schema change
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MigrationScript {
    name: Cow<'static, str>,
    sql: Cow<'static, str>,
}

impl MigrationScript {
    pub fn new(name: impl Into<Cow<'static, str>>, sql: impl Into<Cow<'static, str>>) -> Self {
        Self {
            name: name.into(),
            sql: sql.into(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn sql(&self) -> &str {
        &self.sql
    }

    /// Leading digits of the name, if any (`"002_add_roles"` -> `2`)
    fn version(&self) -> Option<u64> {
        let digits: String = self.name.chars().take_while(|c| c.is_ascii_digit()).collect();
        digits.parse().ok()
    }
}

/// Orders by numeric prefix, then by full name. Unprefixed names sort last.
fn compare_scripts(a: &MigrationScript, b: &MigrationScript) -> Ordering {
    let key = |s: &MigrationScript| s.version().unwrap_or(u64::MAX);
    key(a).cmp(&key(b)).then_with(|| a.name().cmp(b.name()))
}

/// Set of migration scripts available to the runner.
#[derive(Debug, Clone, Default)]
pub struct ScriptSource {
    scripts: Vec<MigrationScript>,
}

impl ScriptSource {
    /// Scripts bundled into the binary for the given backend
    pub fn embedded(backend: DbBackend) -> Self {
        let scripts = match backend {
            DbBackend::MySql => embedded_scripts!("mysql" => [
                "001_create_users",
                "002_create_roles",
                "003_create_user_roles",
            ]),
            DbBackend::Postgres => embedded_scripts!("postgres" => [
                "001_create_users",
                "002_create_roles",
                "003_create_user_roles",
            ]),
            DbBackend::Sqlite => embedded_scripts!("sqlite" => [
                "001_create_users",
                "002_create_roles",
                "003_create_user_roles",
            ]),
        };

        Self { scripts }
    }

    /// Source over an explicit list, in any discovery order
    pub fn from_scripts(scripts: impl IntoIterator<Item = MigrationScript>) -> Self {
        Self {
            scripts: scripts.into_iter().collect(),
        }
    }

    pub fn len(&self) -> usize {
        self.scripts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.scripts.is_empty()
    }

    /// Scripts in application order.
    ///
    /// Fails if two scripts share a name.
    pub fn ordered(&self) -> Result<Vec<&MigrationScript>, MigrationError> {
        let mut seen = HashSet::with_capacity(self.scripts.len());
        for script in &self.scripts {
            if !seen.insert(script.name()) {
                return Err(MigrationError::DuplicateScript(script.name().to_string()));
            }
        }

        let mut ordered: Vec<&MigrationScript> = self.scripts.iter().collect();
        ordered.sort_by(|a, b| compare_scripts(a, b));
        Ok(ordered)
    }
}

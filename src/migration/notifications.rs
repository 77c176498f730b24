use clap::ValueEnum;
use serde::{Deserialize, Serialize};

use super::{Migration, Rule};
use crate::error::MigrateResult;

pub const TYPES_IMPORT: &str = r#"import { DeletedPost } from "./types";"#;
pub const HOOK_IMPORT: &str = r#"import { useNotifications } from "./hooks/useNotifications";"#;
const HOOK_IMPORT_PRESENT: &str = "import { useNotifications }";

const SCHEDULED_STATE_PATTERN: &str =
    r"const \[notificationScheduled, setNotificationScheduled\] = useState\(false\);";
const STATUS_STATE_PATTERN: &str = r"const \[notificationStatus, setNotificationStatus\] = useState<'unknown' \| 'granted' \| 'denied' \| 'unsupported'>\('unknown'\);";

pub const SCHEDULED_STATE_LINE: &str =
    "  const [notificationScheduled, setNotificationScheduled] = useState(false);";

pub const HOOK_CALL: &str = "  const {
    notification,
    notificationStatus,
    notificationScheduled,
    setNotificationScheduled,
    requestNotificationPermission,
    showNotification,
    scheduleNotification,
    clearNotification
  } = useNotifications();";

/// Helpers that move into the hook, with the rule name that removes each
const EXTRACTED_FUNCTIONS: [(&str, &str); 3] = [
    (
        "remove-show-notification",
        "const showNotification = (message: string) => {",
    ),
    (
        "remove-request-permission",
        "const requestNotificationPermission = async () => {",
    ),
    (
        "remove-schedule-notification",
        "const scheduleNotification = (title: string, options?: NotificationOptions) => {",
    ),
];

/// Closing brace of a component-level function
const FUNCTION_END: &str = "\n  }";

/// Where the hook call is inserted relative to the state deletions
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "kebab-case")]
pub enum StepOrder {
    /// Replace the indented scheduled-state line with the hook call, then
    /// delete whatever state declarations remain
    #[default]
    HookFirst,
    /// Delete the state declarations first; the hook call never finds its line
    Original,
}

/// Build the App.tsx notification migration in the requested order
pub fn notification_migration(order: StepOrder) -> MigrateResult<Migration> {
    let add_import = Rule::insert_after(
        "add-hook-import",
        TYPES_IMPORT,
        HOOK_IMPORT,
        HOOK_IMPORT_PRESENT,
    )
    .required();
    let remove_scheduled = Rule::regex_delete("remove-scheduled-state", SCHEDULED_STATE_PATTERN)?;
    let remove_status = Rule::regex_delete("remove-status-state", STATUS_STATE_PATTERN)?.required();
    let hook_call = Rule::replace_first("insert-hook-call", SCHEDULED_STATE_LINE, HOOK_CALL);

    let mut rules = match order {
        StepOrder::HookFirst => vec![add_import, hook_call.required(), remove_scheduled, remove_status],
        StepOrder::Original => vec![add_import, remove_scheduled, remove_status, hook_call],
    };

    rules.extend(
        EXTRACTED_FUNCTIONS
            .iter()
            .map(|(name, signature)| Rule::excise(*name, *signature, FUNCTION_END).required()),
    );

    Ok(Migration::new(rules))
}

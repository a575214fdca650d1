//! Chat message texts

use std::time::Duration;

use crate::error::BotError;
use crate::models::DeviceList;

pub const LOGIN_FAILED: &str = "Ошибка: Не удалось получить токен авторизации.";
pub const REFRESH_FAILED: &str = "Ошибка: Не удалось обновить токен авторизации.";
pub const FETCH_FAILED: &str = "Ошибка: Не удалось получить данные от API.";
pub const GENERIC_FAILURE: &str =
    "Ошибка: Не удалось получить данные от API. Проверьте соединение или повторите попытку позже.";
pub const ALL_AVAILABLE: &str =
    "Данные успешно получены от API. Вы можете запросить список магазинов командой /get_stores.";
pub const STORES_HEADER: &str = "Список магазинов:";
pub const CHECK_STOPPED: &str = "Периодический запрос к API остановлен.";
pub const CHECK_NOT_RUNNING: &str = "Периодический запрос к API не запущен.";

pub fn device_unavailable(name: &str) -> String {
    format!("Магазин {} камера не доступна.", name)
}

/// Russian plural form: 1 минуту, 2 минуты, 5 минут
fn plural<'a>(n: u64, one: &'a str, few: &'a str, many: &'a str) -> &'a str {
    match (n % 10, n % 100) {
        (1, m) if m != 11 => one,
        (2..=4, m) if !(12..=14).contains(&m) => few,
        _ => many,
    }
}

pub fn check_started(interval: Duration) -> String {
    let secs = interval.as_secs();
    let (n, unit) = if secs % 60 == 0 {
        let n = secs / 60;
        (n, plural(n, "минуту", "минуты", "минут"))
    } else {
        (secs, plural(secs, "секунду", "секунды", "секунд"))
    };
    let every = plural(n, "Каждую", "Каждые", "Каждые");
    format!(
        "Периодический запрос к API начат. {} {} {} будет проверка.",
        every, n, unit
    )
}

/// Single-message reply for the on-demand status query
pub fn stores_summary(result: &Result<DeviceList, BotError>) -> String {
    let mut body = String::new();
    match result {
        Ok(list) if !list.accepted => body.push_str(GENERIC_FAILURE),
        Ok(list) => {
            for device in list.unavailable() {
                body.push_str(&device_unavailable(&device.name));
                body.push('\n');
            }
        }
        Err(_) => body.push_str(GENERIC_FAILURE),
    }
    format!("{}\n{}", STORES_HEADER, body)
}

//! Fixed user-facing message copy. Internal errors are never rendered
//! here; users get these texts, the details go to the log.

pub const HELP: &str = "Я умею присылать расписание занятий.\n\n\
Команды:\n\
/bind <группа> — привязать группу к этому чату\n\
/unbind — удалить привязку\n\
«расписос» — расписание на сегодня\n\
«расписос на завтра» — расписание на завтра\n\n\
К запросу можно добавить номер группы и дату в формате ДД.ММ.";

pub const GENERIC_ERROR: &str = "Что-то пошло не так, попробуйте позже.";

pub const NO_ACCESS: &str = "Недостаточно прав для этой команды.";

pub const NO_BINDING: &str = "Для этого чата группа не привязана.";

pub const UNBOUND: &str = "Ассоциация удалена.";

pub const QUERY_USAGE: &str = "Не знаю, какой группе нужно расписание. \
Укажите номер группы в сообщении или привяжите её командой /bind <группа>.";

pub const UNKNOWN_FACULTY: &str = "Не удалось определить факультет по номеру группы — проверьте номер.";

pub const FETCH_FAILED: &str = "Не удалось загрузить расписание, попробуйте позже.";

pub const BAD_DATE: &str = "Не понял дату — нужен формат ДД.ММ.";

pub const NO_BINDINGS_YET: &str = "Привязок пока нет.";

pub const TODAY_IS_SUNDAY: &str = "Сегодня воскресенье, но вот расписание на понедельник: \n";

pub const TOMORROW_IS_SUNDAY: &str = "Завтра воскресенье, но вот расписание на понедельник: \n";

pub fn successful_bind(group: &str) -> String {
    format!("Готово! Чат привязан к группе {group}.")
}

pub fn successful_rebind(old_group: &str, new_group: &str) -> String {
    format!("Привязка обновлена: {old_group} → {new_group}.")
}

pub fn bind_usage(current: Option<&str>) -> String {
    match current {
        Some(group) => format!(
            "Не нашёл номер группы в сообщении. Сейчас чат привязан к группе {group}."
        ),
        None => "Не нашёл номер группы в сообщении. Пример: /bind 151-1".to_string(),
    }
}

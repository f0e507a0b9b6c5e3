//! User-facing texts. The bot speaks Russian only.

use crate::domain::User;

pub const GREETING: &str = "Привет! Это бот для стендапа.";
pub const GENERIC_FAILURE: &str = "Что-то пошло не так, произошла ошибка :(";

// ============== Event creation wizard ==============

pub const CREATE_ONLY_IN_PRIVATE: &str = "Создать мероприятие можно только в личных сообщениях.";
pub const USE_CREATE_EVENT: &str = "Создать мероприятие можно через команду /create_event";
pub const START_TIME_UNPARSEABLE: &str =
    "Не удалось распознать время начала мероприятия. Попробуйте ещё раз.";
pub const START_TIME_IN_PAST: &str = "Время в прошлом! Повторите попытку.";
pub const ASK_DESCRIPTION: &str = "Опишите мероприятие одним сообщением, позже оно будет переслано в общую группу. \
Вы также можете прикрепить изображение к сообщению.\n\n\
Также укажите в сообщении дату и время мероприятия, так как оно будет переслано без изменений.";
pub const MISSING_CAPTION: &str = "Не указана подпись к картинке! Повторите попытку.";
pub const STALE_CONFIRMATION: &str = "Что-то пошло не так :/\n\nПовторите попытку.";
pub const EVENT_CREATED: &str =
    "Новое мероприятие создано. Для закрытия записи нажмите на кнопку ниже.";

pub const CONFIRM_BUTTON: &str = "Подтвердить";
pub const CANCEL_BUTTON: &str = "Отмена";
pub const REGISTER_BUTTON: &str = "+";
pub const CLOSE_REGISTRATION_BUTTON: &str = "Завершить регистрацию";

pub fn ask_start_time(example: &str) -> String {
    format!(
        "Для создания мероприятия укажите дату и время мероприятия в формате дд.мм.гггг чч:мм.\n\n\
Например, \"{example}\"."
    )
}

pub fn confirm_creation(event_time: &str) -> String {
    format!(
        "Дата и время мероприятия: {event_time} (мск).\n\n\
После подтверждения сообщение выше будет сразу отправлено в общую группу."
    )
}

// ============== Registration ==============

pub const EVENT_NOT_FOUND: &str = "Мероприятие не найдено :(";
pub const ALREADY_CLOSED: &str = "Регистрация уже была закрыта ранее";
pub const CLOSED_NO_ATTENDEES: &str = "Регистрация закрыта! Участников нет.";

pub fn registration_finished(event_time: &str) -> String {
    format!("Регистрация на мероприятие {event_time} уже завершена.")
}

pub fn registered(event_time: &str) -> String {
    format!("Ты успешно зарегистрировался на мероприятие {event_time}")
}

pub fn already_registered(event_time: &str) -> String {
    format!("Ты уже зарегистрирован на мероприятие {event_time}.")
}

pub fn registration_cancelled(event_time: &str) -> String {
    format!("Регистрация на мероприятие {event_time} отменена.")
}

pub fn admin_registration_notice(user: &User, event_time: &str) -> String {
    format!("{} зарегистрировался на {event_time}", user.display_name())
}

pub fn registration_closed_announcement(event_time: &str) -> String {
    format!("Регистрация на мероприятие {event_time} закрыта.")
}

/// Numbered attendee list in registration order.
pub fn attendee_report(users: &[User]) -> String {
    if users.is_empty() {
        return CLOSED_NO_ATTENDEES.to_string();
    }
    let mut text = "Регистрация закрыта! Участники: \n\n".to_string();
    for (idx, user) in users.iter().enumerate() {
        text.push_str(&format!("{}. {}\n", idx + 1, user.display_name()));
    }
    text
}

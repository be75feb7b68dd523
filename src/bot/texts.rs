//! User-facing message and button texts, single locale (Russian).

/// Reply-keyboard button labels. Free-text dispatch matches on these exact
/// strings, so they must stay in sync with the keyboards built in
/// `commands::menu`.
pub mod buttons {
    pub const GET_COINS: &str = "Получить доброкоины";
    pub const TOTAL_COINS: &str = "Сколько у меня доброкоинов";
    pub const LOTS: &str = "Лоты на аукционе";
    pub const CHECK_GOOD_DEEDS: &str = "Проверка добрых дел";
    pub const STATISTICS: &str = "Общая статистика";
    pub const ATTEND_EVENT: &str = "За посещение мероприятия";
    pub const GOOD_DEED: &str = "За доброе дело";
    pub const QUIZ: &str = "Викторина про добро";
    pub const BACK: &str = "Назад";

    pub const CONFIRM_GOOD_DEED: &str = "Подтвердить";
    pub const REJECT_GOOD_DEED: &str = "Отклонить";
}

pub const WELCOME: &str = "Добро пожаловать! Выберите действие в меню.";
pub const NOT_REGISTERED: &str = "Вы ещё не зарегистрированы. Отправьте одним сообщением: Фамилия Имя и опыт волонтёрства, например: Иван Петров 6 месяцев";
pub const REGISTERED: &str = "Регистрация завершена! Добро пожаловать в программу доброкоинов.";
pub const INVALID_REGISTRATION: &str = "Не получилось разобрать данные. Отправьте: Фамилия Имя и опыт, например: Иван Петров 6 месяцев";
pub const MISSING_USERNAME: &str = "У вашего аккаунта Telegram не задан username. Добавьте его в настройках и попробуйте снова.";
pub const SELECT_ACTION: &str = "Выберите действие:";
pub const FLOW_LAPSED: &str = "Предыдущее действие отменено из-за долгого бездействия. Начните заново через меню.";

pub const ENTER_CODE_WORD: &str = "Введите кодовое слово мероприятия:";
pub const INVALID_CODE_WORD: &str = "Такого кодового слова нет. Проверьте написание.";
pub const CODE_ALREADY_USED: &str = "Вы уже использовали это кодовое слово.";

pub const UPLOAD_GOOD_DEED_PHOTO: &str = "Отправьте фотографию вашего доброго дела, можно с подписью.";
pub const PHOTO_REQUIRED: &str = "Нужна именно фотография. Отправьте фото вашего доброго дела.";
pub const GOOD_DEED_REGISTERED: &str = "Спасибо! Доброе дело отправлено на проверку администраторам.";
pub const MAX_GOOD_DEEDS: &str = "На сегодня лимит добрых дел исчерпан (10 в день). Возвращайтесь завтра!";
pub const EMPTY_DEED_DESCRIPTION: &str = "Без описания";

pub const QUIZ_ALREADY_ATTEMPTED: &str = "Вы уже проходили викторину сегодня. Возвращайтесь завтра!";
pub const NO_QUESTIONS_TODAY: &str = "На сегодня вопросов викторины нет. Загляните позже!";
pub const QUIZ_ANSWER_PREFIX: &str = "Ваш ответ:";

pub const NO_LOTS: &str = "Лотов на аукционе пока нет.";
pub const NO_GOOD_DEEDS_PENDING: &str = "Нет добрых дел, ожидающих проверки.";
pub const INSUFFICIENT_PERMISSIONS: &str = "Недостаточно прав для этого действия.";
pub const GENERIC_ERROR: &str = "Что-то пошло не так. Попробуйте ещё раз позже.";
pub const GOOD_DEED_NOT_FOUND: &str = "Доброе дело не найдено.";

pub fn total_coins(coins: i64) -> String {
    format!("У вас {coins} доброкоинов.")
}

pub fn quiz_finished(correct: i64, coins_earned: i64, total: i64) -> String {
    format!(
        "Викторина завершена! Правильных ответов: {correct}. Вы заработали {coins_earned} доброкоинов. {}",
        total_coins(total)
    )
}

pub fn good_deed_review_caption(login: &str, deed_id: i64, description: &str) -> String {
    format!("Доброе дело №{deed_id} от @{login}:\n\n{description}")
}

pub fn good_deed_confirmed(deed_id: i64) -> String {
    format!("Доброе дело №{deed_id} подтверждено, волонтёру начислено 30 доброкоинов.")
}

pub fn good_deed_rejected(deed_id: i64) -> String {
    format!("Доброе дело №{deed_id} отклонено.")
}

pub fn statistics_summary(total_experience: i64, total_coins: i64) -> String {
    format!(
        "📊 Общая статистика\n• Суммарный опыт: {total_experience} месяцев\n• Общий балл: {total_coins} доброкоинов"
    )
}

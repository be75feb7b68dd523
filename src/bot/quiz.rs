//! Daily quiz sub-engine.
//!
//! Quiz state (the day's questions, the current index, and the running score)
//! lives inside the chat's [`Flow::Quiz`] session variant. Each correct
//! answer is worth [`COINS_PER_CORRECT`] coins; completion credits the
//! balance and records a once-per-day attempt row.

use teloxide::prelude::*;
use teloxide::types::{InlineKeyboardButton, InlineKeyboardMarkup};
use tracing::{error, warn};

use crate::bot::session::{Flow, SessionStore};
use crate::bot::texts;
use crate::database::connection::DatabaseManager;
use crate::database::models::{QuizAttempt, QuizQuestion, User};
use crate::utils::datetime::today_string;

pub const COINS_PER_CORRECT: i64 = 20;

/// Callback data prefix distinguishing quiz answers from other inline buttons.
pub const CALLBACK_PREFIX: &str = "quiz:";

/// Mutable quiz state carried across answer events.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct QuizProgress {
    pub questions: Vec<QuizQuestion>,
    pub current_index: usize,
    pub correct_count: i64,
}

impl QuizProgress {
    pub fn new(questions: Vec<QuizQuestion>) -> Self {
        Self {
            questions,
            current_index: 0,
            correct_count: 0,
        }
    }

    /// The question awaiting an answer, `None` once the quiz is finished.
    pub fn current_question(&self) -> Option<&QuizQuestion> {
        self.questions.get(self.current_index)
    }

    /// Scores one answer token against the current question and advances.
    /// The comparison against the stored correct-option label is exact and
    /// case-sensitive. Returns whether the answer was correct.
    pub fn apply_answer(&mut self, answer: &str) -> bool {
        let correct = self
            .current_question()
            .is_some_and(|q| q.correct_answer == answer);
        if correct {
            self.correct_count += 1;
        }
        self.current_index += 1;
        correct
    }

    pub fn is_finished(&self) -> bool {
        self.current_index >= self.questions.len()
    }

    pub fn coins_earned(&self) -> i64 {
        self.correct_count * COINS_PER_CORRECT
    }
}

/// Renders a question prompt with its present options appended line by line.
pub fn question_text(question: &QuizQuestion) -> String {
    let mut text = question.question.clone();
    for (label, option) in question.options() {
        text.push_str(&format!("\n{label}) {option}"));
    }
    text
}

/// One callback button per present option, two buttons per row.
pub fn answer_keyboard(question: &QuizQuestion) -> InlineKeyboardMarkup {
    let buttons: Vec<InlineKeyboardButton> = question
        .options()
        .iter()
        .map(|(label, _)| {
            InlineKeyboardButton::callback(label.to_string(), format!("{CALLBACK_PREFIX}{label}"))
        })
        .collect();

    let rows: Vec<Vec<InlineKeyboardButton>> =
        buttons.chunks(2).map(|chunk| chunk.to_vec()).collect();
    InlineKeyboardMarkup::new(rows)
}

async fn send_question(
    bot: &Bot,
    chat_id: ChatId,
    question: &QuizQuestion,
) -> ResponseResult<()> {
    bot.send_message(chat_id, question_text(question))
        .reply_markup(answer_keyboard(question))
        .await?;
    Ok(())
}

/// Starts the quiz flow for a chat. Short-circuits without creating quiz
/// state when the user has already attempted today or no questions are
/// configured for today.
pub async fn start(
    bot: Bot,
    msg: Message,
    db: &DatabaseManager,
    sessions: &SessionStore,
) -> ResponseResult<()> {
    let chat_id = msg.chat.id;
    sessions.reset(chat_id).await;

    let Some(login) = msg.from().and_then(|u| u.username.clone()) else {
        bot.send_message(chat_id, texts::MISSING_USERNAME).await?;
        return Ok(());
    };

    let today = today_string();

    match QuizAttempt::exists(&db.pool, &login, &today).await {
        Ok(true) => {
            bot.send_message(chat_id, texts::QUIZ_ALREADY_ATTEMPTED).await?;
            return Ok(());
        }
        Ok(false) => {}
        Err(e) => {
            error!("Failed to check quiz attempt for {}: {}", login, e);
            bot.send_message(chat_id, texts::GENERIC_ERROR).await?;
            return Ok(());
        }
    }

    let questions = match QuizQuestion::for_date(&db.pool, &today).await {
        Ok(questions) => questions,
        Err(e) => {
            error!("Failed to load quiz questions for {}: {}", today, e);
            bot.send_message(chat_id, texts::GENERIC_ERROR).await?;
            return Ok(());
        }
    };

    if questions.is_empty() {
        bot.send_message(chat_id, texts::NO_QUESTIONS_TODAY).await?;
        return Ok(());
    }

    let progress = QuizProgress::new(questions);
    let first = progress.current_question().cloned();
    sessions.set_flow(chat_id, Flow::Quiz(progress)).await;

    if let Some(question) = first {
        send_question(&bot, chat_id, &question).await?;
    }
    Ok(())
}

enum AnswerStep {
    NotInQuiz,
    Ask(QuizQuestion),
    Done { correct: i64 },
}

/// Handles one quiz answer callback: scores it, acknowledges it, removes the
/// stale prompt best-effort, then presents the next question or completes.
pub async fn handle_answer(
    bot: Bot,
    q: CallbackQuery,
    answer: &str,
    db: &DatabaseManager,
    sessions: &SessionStore,
) -> ResponseResult<()> {
    bot.answer_callback_query(q.id.clone()).await?;

    let Some(message) = q.message else {
        return Ok(());
    };
    let chat_id = message.chat.id;

    let step = sessions
        .update(chat_id, |flow| match flow {
            Flow::Quiz(progress) => {
                progress.apply_answer(answer);
                match progress.current_question() {
                    Some(next) => AnswerStep::Ask(next.clone()),
                    None => {
                        let correct = progress.correct_count;
                        *flow = Flow::Idle;
                        AnswerStep::Done { correct }
                    }
                }
            }
            _ => AnswerStep::NotInQuiz,
        })
        .await;

    if matches!(step, AnswerStep::NotInQuiz) {
        // Stale button press from before a restart or after completion.
        return Ok(());
    }

    bot.send_message(chat_id, format!("{} {answer}", texts::QUIZ_ANSWER_PREFIX))
        .await?;

    // Removing the answered prompt is cosmetic; never let it break the flow.
    if let Err(e) = bot.delete_message(chat_id, message.id).await {
        warn!("Failed to delete quiz prompt in chat {}: {}", chat_id, e);
    }

    match step {
        AnswerStep::Ask(question) => send_question(&bot, chat_id, &question).await?,
        AnswerStep::Done { correct } => {
            finish(&bot, chat_id, &q.from.username, correct, db).await?;
        }
        AnswerStep::NotInQuiz => {}
    }
    Ok(())
}

/// Terminal quiz step: credit coins, record the daily attempt, and reply with
/// a summary that re-reads the balance from the store.
async fn finish(
    bot: &Bot,
    chat_id: ChatId,
    login: &Option<String>,
    correct: i64,
    db: &DatabaseManager,
) -> ResponseResult<()> {
    let Some(login) = login else {
        bot.send_message(chat_id, texts::MISSING_USERNAME).await?;
        return Ok(());
    };

    let coins_earned = correct * COINS_PER_CORRECT;
    let today = today_string();

    match complete_quiz(&db.pool, login, &today, correct).await {
        Ok(total) => {
            bot.send_message(chat_id, texts::quiz_finished(correct, coins_earned, total))
                .await?;
        }
        Err(e) => {
            error!("Failed to complete quiz for {}: {}", login, e);
            bot.send_message(chat_id, texts::GENERIC_ERROR).await?;
        }
    }
    Ok(())
}

/// Applies the quiz's terminal effects: credit the balance and record the
/// once-per-day attempt row in one transaction, then return the fresh total
/// balance. The shared transaction means a failed attempt insert (say, a
/// duplicate same-day row) rolls the credit back instead of leaving it behind.
pub async fn complete_quiz(
    pool: &sqlx::SqlitePool,
    login: &str,
    date: &str,
    correct: i64,
) -> Result<i64, sqlx::Error> {
    let mut tx = pool.begin().await?;
    User::adjust_coins(&mut tx, login, correct * COINS_PER_CORRECT).await?;
    QuizAttempt::record(&mut tx, login, date, correct).await?;
    tx.commit().await?;
    User::coins(pool, login).await
}

#[cfg(test)]
mod tests {
    use super::*;

    fn question(id: i64, correct: &str) -> QuizQuestion {
        QuizQuestion {
            id,
            quiz_date: "2024-06-01".to_string(),
            question: format!("Вопрос {id}?"),
            option_a: Some("один".to_string()),
            option_b: Some("два".to_string()),
            option_c: Some("три".to_string()),
            option_d: None,
            correct_answer: correct.to_string(),
        }
    }

    #[test]
    fn scores_two_of_three_correct() {
        let mut progress = QuizProgress::new(vec![
            question(1, "A"),
            question(2, "B"),
            question(3, "C"),
        ]);

        assert!(progress.apply_answer("A"));
        assert!(!progress.apply_answer("C"));
        assert!(progress.apply_answer("C"));

        assert!(progress.is_finished());
        assert_eq!(progress.correct_count, 2);
        assert_eq!(progress.coins_earned(), 40);
    }

    #[test]
    fn answer_comparison_is_case_sensitive() {
        let mut progress = QuizProgress::new(vec![question(1, "A")]);
        assert!(!progress.apply_answer("a"));
        assert_eq!(progress.correct_count, 0);
    }

    #[test]
    fn index_never_skips_and_stays_bounded() {
        let mut progress = QuizProgress::new(vec![question(1, "A"), question(2, "B")]);
        assert_eq!(progress.current_index, 0);
        progress.apply_answer("D");
        assert_eq!(progress.current_index, 1);
        assert!(!progress.is_finished());
        progress.apply_answer("B");
        assert_eq!(progress.current_index, 2);
        assert!(progress.is_finished());
        assert!(progress.current_question().is_none());
    }

    #[test]
    fn question_text_lists_present_options() {
        let q = question(1, "A");
        let text = question_text(&q);
        assert_eq!(text, "Вопрос 1?\nA) один\nB) два\nC) три");
    }

    #[test]
    fn keyboard_groups_two_buttons_per_row() {
        let q = question(1, "A");
        let keyboard = answer_keyboard(&q);
        let rows = &keyboard.inline_keyboard;
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].len(), 2);
        assert_eq!(rows[1].len(), 1);
    }

    #[test]
    fn keyboard_callback_data_carries_quiz_prefix() {
        let q = question(1, "A");
        let keyboard = answer_keyboard(&q);
        let first = &keyboard.inline_keyboard[0][0];
        match &first.kind {
            teloxide::types::InlineKeyboardButtonKind::CallbackData(data) => {
                assert_eq!(data, "quiz:A");
            }
            other => panic!("unexpected button kind: {other:?}"),
        }
    }
}

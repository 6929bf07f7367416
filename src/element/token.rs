//! Token-backed elements: CSRF guards and arithmetic captchas.
//!
//! Both remember the expected answer issued through the
//! [`TokenStore`](crate::tokens::TokenStore) and compare the submitted value
//! against it during validation.

use crate::value::Value;

pub const CSRF_MESSAGE: &str = "The security token did not match. Please try again.";
pub const CAPTCHA_MESSAGE: &str = "The answer to the security question is incorrect.";

#[derive(Debug, Clone, PartialEq)]
pub struct CsrfToken {
    expected: String,
    submitted: Value,
}

impl CsrfToken {
    pub fn new(expected: impl Into<String>) -> Self {
        Self {
            expected: expected.into(),
            submitted: Value::Null,
        }
    }

    pub fn expected(&self) -> &str {
        &self.expected
    }

    pub fn submitted(&self) -> &Value {
        &self.submitted
    }

    pub fn set_submitted(&mut self, value: Value) {
        self.submitted = value;
    }

    pub fn verify(&self) -> bool {
        self.submitted.as_str() == Some(self.expected.as_str())
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Captcha {
    question: String,
    answer: String,
    submitted: Value,
}

impl Captcha {
    pub fn new(question: impl Into<String>, answer: impl Into<String>) -> Self {
        Self {
            question: question.into(),
            answer: answer.into(),
            submitted: Value::Null,
        }
    }

    pub fn question(&self) -> &str {
        &self.question
    }

    pub fn submitted(&self) -> &Value {
        &self.submitted
    }

    pub fn set_submitted(&mut self, value: Value) {
        self.submitted = value;
    }

    /// Answers are numbers; surrounding whitespace is tolerated.
    pub fn verify(&self) -> bool {
        match &self.submitted {
            Value::Null | Value::List(_) => false,
            submitted => submitted.loosely_equals(&Value::from(self.answer.trim())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn csrf_requires_exact_match() {
        let mut token = CsrfToken::new("abc123");
        assert!(!token.verify());
        token.set_submitted(Value::from("abc124"));
        assert!(!token.verify());
        token.set_submitted(Value::from("abc123"));
        assert!(token.verify());
    }

    #[test]
    fn captcha_accepts_numeric_forms() {
        let mut captcha = Captcha::new("3 + 4", "7");
        captcha.set_submitted(Value::from(" 7 "));
        assert!(captcha.verify());
        captcha.set_submitted(Value::from(7));
        assert!(captcha.verify());
        captcha.set_submitted(Value::from("8"));
        assert!(!captcha.verify());
    }
}

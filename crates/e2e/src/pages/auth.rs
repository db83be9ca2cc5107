//! Sign-up pages: email, confirmation code, workspace name

use onboard_common::Candidates;

use super::labelled;

pub mod email {
    use super::*;

    pub fn input() -> Candidates {
        Candidates::new("email input").css("input#email-input")
    }

    pub fn continue_button() -> Candidates {
        Candidates::new("email continue button")
            .xpath("//button[span[contains(normalize-space(.), 'Продолжить')]]")
            .xpath("//button[span[contains(normalize-space(.), 'Continue')]]")
    }

    pub fn error_text() -> Candidates {
        Candidates::new("email error").css("p.hdi_description")
    }
}

pub mod code {
    use super::*;

    /// Single OTP field or one field per digit
    pub fn inputs() -> Candidates {
        Candidates::new("code input")
            .css("input[autocomplete='one-time-code']")
            .css("input[name='code']")
            .css("input[inputmode='numeric']")
            .css("input[type='tel']")
            .css("input[maxlength='6']")
            .css("input[data-otp], input[class*='otp'], input[name*='otp']")
    }

    pub fn back_button() -> Candidates {
        Candidates::new("code back button")
            .css("[data-testid='back-button']")
            .xpath(labelled("button", "Назад"))
            .xpath(labelled("a", "Назад"))
    }

    pub fn continue_button() -> Candidates {
        Candidates::new("code continue button")
            .xpath(labelled("button", "Продолжить"))
            .xpath(labelled("button", "Continue"))
            .css("button[type='submit']")
            .css("button.btn.btn--full-width")
    }
}

pub mod workspace {
    use super::*;

    const UPPER: &str = "ABCDEFGHIJKLMNOPQRSTUVWXYZ";
    const LOWER: &str = "abcdefghijklmnopqrstuvwxyz";

    fn lowered(attr: &str) -> String {
        format!("translate(@{attr},'{UPPER}','{LOWER}')")
    }

    pub fn name_input() -> Candidates {
        let placeholder = lowered("placeholder");
        let hints = ["ворк", "пространств", "workspace", "company", "компан"]
            .iter()
            .map(|hint| format!("contains({placeholder},'{hint}')"))
            .collect::<Vec<_>>()
            .join(" or ");

        Candidates::new("workspace name input")
            .css("input[name='workspaceName']")
            .css("input#workspace-name")
            .css("input[type='text']")
            .xpath(format!("//input[contains({},'workspace')]", lowered("id")))
            .xpath(format!("//input[{hints}]"))
    }

    pub fn next_button() -> Candidates {
        Candidates::new("workspace next button").css("button[type='submit']")
    }

    pub fn back_button() -> Candidates {
        Candidates::new("workspace back button")
            .css("[data-testid='back-button']")
            .xpath("//button[contains(normalize-space(.), 'Назад')]")
    }

    pub fn error_indicator() -> Candidates {
        Candidates::new("workspace name error")
            .css("input[aria-invalid='true']")
            .css(".error, .error-text, .field-error")
    }

    pub const URL_MARKER: &str = "workspace";
}

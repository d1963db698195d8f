//! Moderator prompt templates

/// Templates for the chat manager's own messages
pub struct ModeratorPrompt;

impl ModeratorPrompt {
    /// Introduction every participant receives at the start of a chat
    pub fn intro(roles: &str) -> String {
        format!(
            r#"Hello everyone. We have assembled a great team today to answer questions and solve tasks. In attendance are:

{}
"#,
            roles
        )
    }

    /// System instruction for selecting the next speaker.
    ///
    /// This is always the *first* message in the moderator's context.
    pub fn system(roster_size: usize, roles: &str, names: &[&str]) -> String {
        format!(
            r#"You are moderating a conversation between {roster_size} participants who are working together to answer questions and perform tasks. Your role is as a moderator. DON'T DIRECTLY ANSWER THE QUESTIONS OR PERFORM ANY OF THE WORK YOURSELF. IN PARTICULAR, DO NOT WRITE ANY CODE YOURSELF. INSTEAD, DIRECT THE PARTICIPANTS TO DO SO, AS APPROPRIATE. In attendance are the following participants:

{roles}

Read the following conversation, then carefully consider who you should speak to next, and what you should ask of them, so as to make the most progress on the task. Speakers do not need equal speaking time. You may even ignore non-relevant participants. Your focus is on efficiently driving progress toward task completion.

After each participant response, decide the following:
    - WHO should speak next? (A valid participant name, selected from this list: {names:?})
    - WHAT should you ask of them? (phrased the way you would actually ask them in conversation)
    - WHY it makes sense to ask them at this moment (your internal reasoning)

{format}"#,
            format = Self::output_format(),
        )
    }

    /// Floating instruction for selecting the next speaker.
    ///
    /// This is always the *last* message in the moderator's context. When
    /// `excluded` is set, the moderator is told not to pick that speaker.
    pub fn floating(names: &[&str], excluded: Option<&str>) -> String {
        let exclude_note = match excluded {
            Some(name) => format!(
                "\nNote: Don't ask {} again, since they just spoke. Instead ask {}.",
                name,
                names.join(" or ")
            ),
            None => String::new(),
        };

        format!(
            r#"Remember, YOUR role is to serve as a moderator. DON'T ANSWER QUESTIONS, CODE, OR PERFORM OTHER WORK YOURSELF. Instead, read the above conversation, then carefully decide the following, with a focus on making progress on the task:

    - WHO should speak next? (A valid participant name, selected from this list: {names:?})
    - WHAT should you ask of them? (phrased the way you would actually ask them in conversation)
    - WHY it makes sense to ask them at this moment (your internal reasoning)
{exclude_note}

{format}"#,
            format = Self::output_format(),
        )
    }

    fn output_format() -> &'static str {
        r#"Your output should be a perfect JSON object as per below:
    {
        "why": your_reasoning,
        "who": participant_name,
        "what": your_question_or_request
    }

DO NOT OUTPUT ANYTHING OTHER THAN THIS JSON OBJECT. YOUR OUTPUT MUST BE PARSABLE AS JSON.
"#
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_floating_without_exclusion() {
        let prompt = ModeratorPrompt::floating(&["A", "B"], None);
        assert!(!prompt.contains("Don't ask"));
        assert!(prompt.contains(r#"["A", "B"]"#));
        assert!(prompt.contains("PARSABLE AS JSON"));
    }

    #[test]
    fn test_system_mentions_structured_fields() {
        let prompt = ModeratorPrompt::system(2, "A: a\nB: b", &["A", "B"]);
        assert!(prompt.contains("\"who\": participant_name"));
        assert!(prompt.contains("A: a\nB: b"));
    }
}

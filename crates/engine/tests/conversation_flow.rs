//! End-to-end conversation flow test
//!
//! Walks a full visitor session through onboarding and into free-form
//! enquiries, including the quick-question click path.

use std::sync::Arc;

use chat_widget_config::{IntentCatalog, MessageTemplates, WidgetConfig};
use chat_widget_core::ConversationState;
use chat_widget_engine::FlowController;

fn new_controller() -> FlowController {
    FlowController::new(
        Arc::new(IntentCatalog::builtin()),
        Arc::new(MessageTemplates::default()),
    )
}

#[test]
fn full_session_walkthrough() {
    let mut flow = new_controller();

    // Name step
    let reply = flow.handle("Asha");
    assert_eq!(
        reply.text,
        "Thank you, Asha. Please share your contact number:"
    );
    assert!(!reply.show_menu);
    assert!(!reply.onboarding_just_completed);
    assert_eq!(flow.state(), ConversationState::AwaitingPhone);

    // Invalid number is re-prompted without a state change
    let reply = flow.handle("98765");
    assert_eq!(reply.text, "Please enter a valid 10-digit contact number:");
    assert!(!reply.show_menu);
    assert!(!reply.onboarding_just_completed);
    assert_eq!(flow.state(), ConversationState::AwaitingPhone);

    // Valid number completes onboarding, exactly once
    let reply = flow.handle("9876543210");
    assert_eq!(reply.text, "Thank you! How can I help you today?");
    assert!(reply.show_menu);
    assert!(reply.onboarding_just_completed);
    assert_eq!(flow.state(), ConversationState::FreeForm);
    assert_eq!(flow.profile().name(), Some("Asha"));
    assert_eq!(flow.profile().phone(), Some("9876543210"));

    // Free-form enquiry resolves against the catalog with the menu shown
    let reply = flow.handle("What is the fee structure?");
    assert!(reply.text.starts_with("Fee structure:"));
    assert!(reply.show_menu);
    assert!(!reply.onboarding_just_completed);
    assert_eq!(flow.state(), ConversationState::FreeForm);
}

#[test]
fn visited_states_are_a_prefix_of_the_sequence() {
    let expected = [
        ConversationState::AwaitingName,
        ConversationState::AwaitingPhone,
        ConversationState::FreeForm,
    ];

    let mut flow = new_controller();
    let mut visited = vec![flow.state()];

    for input in ["Asha", "not a number", "9876543210", "courses?", "bye"] {
        flow.handle(input);
        if visited.last() != Some(&flow.state()) {
            visited.push(flow.state());
        }
    }

    assert_eq!(visited, expected);
}

#[test]
fn quick_question_click_path() {
    // Clicking a menu item re-enters handle() with the literal text
    let config = WidgetConfig::default();
    let mut flow = FlowController::new(
        Arc::new(config.catalog.clone()),
        Arc::new(config.messages.clone()),
    );

    flow.handle("Asha");
    flow.handle("9876543210");

    for question in &config.quick_questions {
        let reply = flow.handle(question);
        assert!(!reply.text.is_empty());
        assert!(reply.show_menu, "menu must refresh after {question:?}");
        assert!(!reply.onboarding_just_completed);
    }

    // Every quick question matches some catalog entry, none falls back
    for question in &config.quick_questions {
        let reply = flow.handle(question);
        assert_ne!(reply.text, config.catalog.default_response, "{question:?}");
    }
}

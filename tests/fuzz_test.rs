mod common;

use common::started;
use trufoso::commands::{CommandDispatcher, DogCommand};
use trufoso::script::{ButtonId, TrainingScript};
use trufoso::sequencer::VoiceOutcome;

#[test]
fn test_recognizer_garbage_flood() {
    let dispatcher = CommandDispatcher::default();

    let garbage = [
        "asdfghjkl",
        "!!! @@@ ###",
        "1234567890",
        "una frase muy larga que no significa nada para el perro pero que un reconocedor podría devolver si escucha la televisión de fondo",
        "",
        " ",
        "\n\t",
        "sentad",
        "pat",
    ];

    for text in garbage {
        assert_eq!(dispatcher.dispatch(text), None, "'{}'", text);
    }

    // The sequencer must stay usable after a flood
    let (mut seq, _ui, animator) = started(TrainingScript::sit());
    for i in 0..200 {
        let text = garbage[i % garbage.len()];
        assert_eq!(seq.on_voice_text(text), VoiceOutcome::Unrecognized);
    }
    for _ in 0..50 {
        assert!(!seq.on_button_clicked(ButtonId::Ball));
    }
    assert_eq!(seq.step(), 1);
    assert!(animator.triggered().is_empty());

    assert_eq!(
        seq.on_voice_text("siéntate"),
        VoiceOutcome::StepSatisfied(DogCommand::Sit)
    );
}

#[test]
fn test_command_spam_advances_once_per_step() {
    let (mut seq, _ui, animator) = started(TrainingScript::paw());

    // Only the first "sentado" belongs to step 1; the rest hit the paw step
    for _ in 0..20 {
        seq.on_voice_text("sentado");
    }
    assert_eq!(seq.step(), 2);
    assert_eq!(animator.triggered(), vec![DogCommand::Sit]);
}

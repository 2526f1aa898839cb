use crate::app::App;
use crate::input::InputAction;

pub fn dispatch(app: &mut App, action: InputAction) {
    match action {
        InputAction::None => {}
        InputAction::Quit => app.should_quit = true,
        InputAction::ToggleHelp => app.show_help = !app.show_help,
        InputAction::MoveUp => app.move_cursor(0, -1),
        InputAction::MoveDown => app.move_cursor(0, 1),
        InputAction::MoveLeft => app.move_cursor(-1, 0),
        InputAction::MoveRight => app.move_cursor(1, 0),
        InputAction::Activate => app.activate_primary(),
        InputAction::Dismiss => {
            if app.show_help {
                app.show_help = false;
            } else {
                app.close_congrats();
            }
        }
        InputAction::Restart => app.restart(),
    }
}

//! Message mode output.

pub fn print_result(text: &str, delivered: bool) {
    if delivered {
        println!("sent: {text}");
    } else {
        println!("no notification channel resolved; message not sent");
    }
}

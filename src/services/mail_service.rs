use crate::utils::error::AppError;

/// Outbound mail. Actual SMTP delivery is deployment infrastructure; the
/// service composes the message and hands it to the transport, which here
/// records it on the application log.
pub async fn send_mail(to: &str, subject: &str, body: &str) -> Result<(), AppError> {
    let from = std::env::var("MAIL_FROM").unwrap_or_else(|_| "no-reply@elearning.local".to_string());

    log::info!("Sending mail from {} to {}: {}", from, to, subject);
    log::debug!("Mail body: {}", body);

    Ok(())
}

/// Welcome mail for accounts provisioned by an admin. The generated
/// password doubles as the initial login credential.
pub async fn send_welcome_mail(
    to: &str,
    fullname: &str,
    generated_password: &str,
) -> Result<(), AppError> {
    let login_url =
        std::env::var("FRONTEND_URL").unwrap_or_else(|_| "http://localhost:3000".to_string());

    send_mail(
        to,
        "Your Account has been added successfully",
        &format!(
            "Hello {},\nYour email is your Username and Your password for login is: {}\nClick this link for login: {}",
            fullname, generated_password, login_url
        ),
    )
    .await
}

//! `login`: exchange credentials for a bearer token.

use keyzone_core::validation::LoginForm;

use super::{CliError, client};

/// Log in as `email` with the password in `KZ_PASSWORD` and print the token.
pub async fn login(email: &str) -> Result<(), CliError> {
    let password =
        std::env::var("KZ_PASSWORD").map_err(|_| CliError::MissingEnvVar("KZ_PASSWORD"))?;

    let credentials = LoginForm {
        email: email.to_owned(),
        password,
        redirect: None,
    }
    .validate()
    .map_err(|errors| CliError::Invalid(errors.to_string()))?;

    let response = client()?.login(&credentials).await?;
    tracing::info!(
        user = %response.user.username,
        role = response.user.role.as_str(),
        "Logged in"
    );

    #[allow(clippy::print_stdout)]
    {
        println!("{}", response.token.expose());
    }
    Ok(())
}

use crate::application::ports::edms_client::EdmsClient;
use crate::application::use_cases::error::UseCaseError;
use crate::domain::users::user::User;

pub struct GetMe<'a, C: EdmsClient + ?Sized> {
    pub client: &'a C,
}

impl<'a, C: EdmsClient + ?Sized> GetMe<'a, C> {
    pub async fn execute(&self, token: &str) -> Result<User, UseCaseError> {
        Ok(self.client.current_user(token).await?)
    }
}

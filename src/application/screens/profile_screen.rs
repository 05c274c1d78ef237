// src/application/screens/profile_screen.rs

use std::sync::Arc;

use crate::application::dto::UserDto;
use crate::application::resource::Resource;
use crate::services::{LoginRequest, ProfileService, RegisterRequest, UpdateProfileRequest};

/// Profile screen: session state and own-profile editing.
pub struct ProfileScreen {
    profile_service: Arc<ProfileService>,
    pub profile: Resource<UserDto>,
    /// Message from the last failed form submission, if any
    pub form_error: Option<String>,
}

impl ProfileScreen {
    pub fn new(profile_service: Arc<ProfileService>) -> Self {
        Self {
            profile_service,
            profile: Resource::Loading,
            form_error: None,
        }
    }

    pub fn is_signed_in(&self) -> bool {
        self.profile_service.is_signed_in()
    }

    pub async fn on_open(&mut self) {
        self.profile = Resource::Loading;
        self.profile = Resource::from_result(
            self.profile_service.me().await.map(UserDto::from),
        );
    }

    pub async fn on_login_submitted(&mut self, email: String, password: String) {
        self.form_error = None;
        self.profile = Resource::Loading;

        let result = self
            .profile_service
            .login(LoginRequest { email, password })
            .await;

        self.profile = Resource::from_result(result.map(UserDto::from));
    }

    pub async fn on_register_submitted(
        &mut self,
        username: String,
        email: String,
        password: String,
    ) {
        self.form_error = None;
        self.profile = Resource::Loading;

        let result = self
            .profile_service
            .register(RegisterRequest {
                username,
                email,
                password,
            })
            .await;

        self.profile = Resource::from_result(result.map(UserDto::from));
    }

    pub fn on_logout(&mut self) {
        if let Err(e) = self.profile_service.logout() {
            self.form_error = Some(e.to_string());
            return;
        }
        self.profile = Resource::Error("Not signed in".to_string());
    }

    pub async fn on_profile_saved(
        &mut self,
        display_name: Option<String>,
        bio: Option<String>,
        avatar_url: Option<String>,
    ) {
        self.form_error = None;

        let result = self
            .profile_service
            .update_profile(UpdateProfileRequest {
                display_name,
                bio,
                avatar_url,
            })
            .await;

        match result {
            Ok(user) => self.profile = Resource::Success(UserDto::from(user)),
            Err(e) => self.form_error = Some(e.to_string()),
        }
    }
}

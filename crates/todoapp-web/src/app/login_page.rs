use std::rc::Rc;

use todoapp_core::LoginController;
use web_sys::{
  HtmlInputElement,
  InputEvent,
  SubmitEvent
};
use yew::{
  Callback,
  Html,
  TargetCast,
  function_component,
  html,
  use_memo,
  use_state
};

use super::host::Redirect;
use super::{
  browser_config,
  browser_session
};
use crate::api::GlooTransport;

#[function_component(LoginPage)]
pub fn login_page() -> Html {
  let username = use_state(String::new);
  let password = use_state(String::new);
  let error = use_state(|| None::<String>);
  let busy = use_state(|| false);

  let controller = use_memo((), |_| {
    LoginController::new(
      &browser_config(),
      browser_session(),
      Rc::new(GlooTransport),
      Rc::new(Redirect)
    )
  });

  let on_username = {
    let username = username.clone();
    Callback::from(move |e: InputEvent| {
      let input: HtmlInputElement =
        e.target_unchecked_into();
      username.set(input.value());
    })
  };

  let on_password = {
    let password = password.clone();
    Callback::from(move |e: InputEvent| {
      let input: HtmlInputElement =
        e.target_unchecked_into();
      password.set(input.value());
    })
  };

  let on_submit = {
    let username = username.clone();
    let password = password.clone();
    let error = error.clone();
    let busy = busy.clone();
    Callback::from(move |e: SubmitEvent| {
      e.prevent_default();
      if *busy {
        return;
      }
      busy.set(true);
      error.set(None);

      let controller = controller.clone();
      let username = (*username).clone();
      let password = (*password).clone();
      let error = error.clone();
      let busy = busy.clone();
      wasm_bindgen_futures::spawn_local(
        async move {
          let outcome = controller
            .submit(&username, &password)
            .await;
          tracing::debug!(
            ?outcome,
            "login form submitted"
          );
          error.set(controller.error());
          busy.set(false);
        }
      );
    })
  };

  html! {
      <main class="login">
          <form id="login-form" onsubmit={on_submit}>
              <h1>{ "Sign in" }</h1>
              <label for="username">{ "Username" }</label>
              <input
                  id="username"
                  type="text"
                  autocomplete="username"
                  value={(*username).clone()}
                  oninput={on_username}
              />
              <label for="password">{ "Password" }</label>
              <input
                  id="password"
                  type="password"
                  autocomplete="current-password"
                  value={(*password).clone()}
                  oninput={on_password}
              />
              <button class="btn" type="submit" disabled={*busy}>{ "Log in" }</button>
              {
                  match &*error {
                      Some(message) => html! { <p id="error-message" class="error">{ message }</p> },
                      None => html! {},
                  }
              }
          </form>
      </main>
  }
}

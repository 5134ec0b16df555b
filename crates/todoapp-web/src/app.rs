mod host;
mod login_page;
mod storage;
mod todo_page;

use std::rc::Rc;

use todoapp_core::Session;
use todoapp_core::config::Config;
use yew::{
  Html,
  function_component,
  html
};
use yew_router::prelude::{
  BrowserRouter,
  Routable,
  Switch
};

use self::login_page::LoginPage;
use self::storage::LocalStorage;
use self::todo_page::TodoPage;

#[derive(Debug, Clone, Routable, PartialEq)]
enum Route {
  #[at("/login/")]
  Login,
  #[at("/")]
  Tasks,
  #[not_found]
  #[at("/404")]
  NotFound
}

fn switch(route: Route) -> Html {
  match route {
    | Route::Login => {
      html! { <LoginPage /> }
    }
    | Route::Tasks => {
      html! { <TodoPage /> }
    }
    | Route::NotFound => {
      html! { <p class="not-found">{ "Page not found." }</p> }
    }
  }
}

/// The browser serves the API from the same origin.
fn browser_config() -> Config {
  Config::default()
}

fn browser_session() -> Session {
  Session::new(Rc::new(LocalStorage))
}

#[function_component(App)]
pub fn app() -> Html {
  html! {
      <BrowserRouter>
          <Switch<Route> render={switch} />
      </BrowserRouter>
  }
}

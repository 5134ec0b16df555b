use std::rc::Rc;

use gloo::timers::future::TimeoutFuture;
use todoapp_core::{
  ActionOutcome,
  Counters,
  Filter,
  Gateway,
  TaskController,
  TaskNode
};
use todoapp_shared::TaskId;
use web_sys::{
  HtmlInputElement,
  HtmlSelectElement,
  InputEvent,
  MouseEvent,
  SubmitEvent
};
use yew::{
  Callback,
  Event,
  Html,
  TargetCast,
  function_component,
  html,
  use_effect_with,
  use_force_update,
  use_memo,
  use_state
};

use super::host::PageHost;
use super::{
  browser_config,
  browser_session
};
use crate::api::GlooTransport;
use crate::components::{
  TaskCounters,
  TaskRow
};

/// Rows whose `transitionend` never fires (no stylesheet) are dropped
/// after this long.
const REMOVAL_FALLBACK_MS: u32 = 600;

#[function_component(TodoPage)]
pub fn todo_page() -> Html {
  let nodes =
    use_state(Vec::<TaskNode>::new);
  let counters =
    use_state(Counters::default);
  let notice = use_state(|| None::<String>);
  let draft = use_state(String::new);
  let filter = use_state(|| Filter::All);
  let refresh = use_force_update();

  let controller = {
    let nodes = nodes.clone();
    let counters = counters.clone();
    let notice = notice.clone();
    use_memo((), move |_| {
      let host = Rc::new(PageHost {
        on_render:   Callback::from(
          move |snapshot| nodes.set(snapshot)
        ),
        on_counters: Callback::from(
          move |value| counters.set(value)
        ),
        on_notice:   Callback::from(
          move |message| {
            notice.set(Some(message))
          }
        )
      });
      let gateway = Gateway::from_config(
        &browser_config(),
        browser_session(),
        Rc::new(GlooTransport),
        host.clone()
      );
      TaskController::new(
        gateway,
        host.clone(),
        host
      )
    })
  };

  {
    let controller = controller.clone();
    use_effect_with((), move |_| {
      let controller =
        (*controller).clone();
      wasm_bindgen_futures::spawn_local(
        async move {
          let outcome =
            controller.load().await;
          tracing::debug!(
            ?outcome,
            "initial task load"
          );
        }
      );
      || ()
    });
  }

  let on_draft = {
    let draft = draft.clone();
    Callback::from(move |e: InputEvent| {
      let input: HtmlInputElement =
        e.target_unchecked_into();
      draft.set(input.value());
    })
  };

  let on_add = {
    let controller = controller.clone();
    let draft = draft.clone();
    Callback::from(move |e: SubmitEvent| {
      e.prevent_default();
      let controller =
        (*controller).clone();
      let draft = draft.clone();
      let title = (*draft).clone();
      wasm_bindgen_futures::spawn_local(
        async move {
          if controller.add(&title).await
            == ActionOutcome::Done
          {
            draft.set(String::new());
          }
        }
      );
    })
  };

  let on_toggle = {
    let controller = controller.clone();
    let refresh = refresh.clone();
    Callback::from(move |id: TaskId| {
      let controller =
        (*controller).clone();
      let refresh = refresh.clone();
      wasm_bindgen_futures::spawn_local(
        async move {
          let outcome =
            controller.toggle(&id).await;
          tracing::debug!(
            id = %id,
            ?outcome,
            "toggle finished"
          );
          refresh.force_update();
        }
      );
    })
  };

  let on_delete = {
    let controller = controller.clone();
    let refresh = refresh.clone();
    Callback::from(move |id: TaskId| {
      let controller =
        (*controller).clone();
      let refresh = refresh.clone();
      wasm_bindgen_futures::spawn_local(
        async move {
          let outcome =
            controller.delete(&id).await;
          refresh.force_update();
          if outcome == ActionOutcome::Done
          {
            TimeoutFuture::new(
              REMOVAL_FALLBACK_MS
            )
            .await;
            controller.finish_removal(&id);
          }
        }
      );
    })
  };

  let on_removed = {
    let controller = controller.clone();
    Callback::from(move |id: TaskId| {
      controller.finish_removal(&id);
    })
  };

  let on_filter = {
    let controller = controller.clone();
    let filter = filter.clone();
    Callback::from(move |e: Event| {
      let select: HtmlSelectElement =
        e.target_unchecked_into();
      match select.value().parse::<Filter>()
      {
        | Ok(value) => {
          controller.filter(value);
          filter.set(value);
        }
        | Err(err) => {
          tracing::warn!(
            error = %err,
            "ignoring filter value"
          );
        }
      }
    })
  };

  let on_clear = {
    let controller = controller.clone();
    Callback::from(move |_: MouseEvent| {
      let controller =
        (*controller).clone();
      wasm_bindgen_futures::spawn_local(
        async move {
          let report =
            controller.clear_all().await;
          tracing::debug!(
            ?report,
            "clear all finished"
          );
        }
      );
    })
  };

  let on_logout = {
    let controller = controller.clone();
    Callback::from(move |_: MouseEvent| {
      controller.logout();
    })
  };

  let on_dismiss = {
    let notice = notice.clone();
    Callback::from(move |_: MouseEvent| {
      notice.set(None)
    })
  };

  let filter_option = |value: Filter, label: &str| {
    html! {
        <option value={value.as_str()} selected={*filter == value}>{ label.to_string() }</option>
    }
  };

  html! {
      <main class="todo-page">
          <header>
              <h1>{ "Todo list" }</h1>
              <button id="logout-btn" class="btn" onclick={on_logout}>{ "Log out" }</button>
          </header>
          {
              match &*notice {
                  Some(message) => html! {
                      <div class="notice" role="alert">
                          <span>{ message }</span>
                          <button class="btn" onclick={on_dismiss}>{ "Dismiss" }</button>
                      </div>
                  },
                  None => html! {},
              }
          }
          <form id="todo-form" onsubmit={on_add}>
              <input
                  id="todo-input"
                  class="todo-input"
                  type="text"
                  value={(*draft).clone()}
                  oninput={on_draft}
              />
              <button class="todo-button" type="submit">{ "Add" }</button>
              <select id="filter-todo" class="filter-todo" onchange={on_filter}>
                  { filter_option(Filter::All, "All") }
                  { filter_option(Filter::Completed, "Completed") }
                  { filter_option(Filter::Incomplete, "Uncompleted") }
              </select>
          </form>
          <ul class="todo-list">
              {
                  for nodes.iter().cloned().map(|node| {
                      let busy = controller.is_in_flight(&node.id);
                      html! {
                          <TaskRow
                              key={node.id.to_string()}
                              node={node.clone()}
                              busy={busy}
                              on_toggle={on_toggle.clone()}
                              on_delete={on_delete.clone()}
                              on_removed={on_removed.clone()}
                          />
                      }
                  })
              }
          </ul>
          <TaskCounters counters={*counters} />
          <button id="clear-all-btn" class="btn danger" onclick={on_clear}>{ "Clear all" }</button>
      </main>
  }
}

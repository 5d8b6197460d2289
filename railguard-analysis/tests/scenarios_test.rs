//! End-to-end scenarios exercising the pipeline's documented properties:
//! standard resource expansion, nested namespacing with action filtering,
//! auth classification through an inheritance chain, an unresolvable engine
//! mount, and the determinism/dedup guarantees the resolver relies on.

use railguard_core::config::AnalyzerConfig;
use railguard_core::model::endpoint::{EndpointFlag, Verb};
use railguard_core::model::resolved::AuthStatus;
use railguard_core::vfs::MemoryFs;

fn run(fs: &MemoryFs) -> (Vec<railguard_core::model::resolved::ResolvedEndpoint>, Vec<railguard_core::model::diagnostic::Diagnostic>) {
    railguard_analysis::analyze(fs, &AnalyzerConfig::default())
}

/// S1: a bare `resources :posts` expands to the seven canonical actions with
/// their conventional verb and path.
#[test]
fn s1_resources_posts_yields_seven_canonical_endpoints() {
    let fs = MemoryFs::new()
        .with_file(
            "config/routes.rb",
            "Rails.application.routes.draw do\n  resources :posts\nend\n",
        )
        .with_file(
            "app/controllers/posts_controller.rb",
            "class PostsController < ApplicationController\nend\n",
        );
    let (endpoints, diagnostics) = run(&fs);
    assert!(diagnostics.is_empty());

    let expect = [
        ("index", Verb::Get, "/posts"),
        ("new", Verb::Get, "/posts/new"),
        ("create", Verb::Post, "/posts"),
        ("show", Verb::Get, "/posts/:id"),
        ("edit", Verb::Get, "/posts/:id/edit"),
        ("update", Verb::Patch, "/posts/:id"),
        ("destroy", Verb::Delete, "/posts/:id"),
    ];
    assert_eq!(endpoints.len(), expect.len());
    for (action, verb, path) in expect {
        let found = endpoints
            .iter()
            .find(|e| e.record.action == action)
            .unwrap_or_else(|| panic!("missing action {action}"));
        assert_eq!(found.record.verb, verb, "verb for {action}");
        assert_eq!(found.record.path, path, "path for {action}");
        assert_eq!(found.record.controller_class, "PostsController");
    }
}

/// S2: a double-nested namespace composes both the path and controller
/// module prefix, and `only:` drops every action not named.
#[test]
fn s2_double_nested_namespace_with_only_yields_two_endpoints() {
    let fs = MemoryFs::new().with_file(
        "config/routes.rb",
        "namespace :api do\n  namespace :v1 do\n    resources :posts, only: [:index, :show]\n  end\nend\n",
    );
    let (endpoints, _) = run(&fs);
    assert_eq!(endpoints.len(), 2);

    let index = endpoints.iter().find(|e| e.record.action == "index").unwrap();
    assert_eq!(index.record.path, "/api/v1/posts");
    assert_eq!(index.record.verb, Verb::Get);
    assert_eq!(index.record.controller_class, "Api::V1::PostsController");

    let show = endpoints.iter().find(|e| e.record.action == "show").unwrap();
    assert_eq!(show.record.path, "/api/v1/posts/:id");
    assert_eq!(show.record.controller_class, "Api::V1::PostsController");
}

/// S3: a regex-matched (non-canonical) auth filter name still classifies the
/// endpoint as authenticated and is reported in its effective filter list.
#[test]
fn s3_regex_matched_auth_filter_is_authenticated() {
    let fs = MemoryFs::new()
        .with_file(
            "config/routes.rb",
            "resources :widgets, only: [:index]\n",
        )
        .with_file(
            "app/controllers/widgets_controller.rb",
            "class WidgetsController < ApplicationController\n  before_action :authenticate_api_user!\nend\n",
        );
    let (endpoints, _) = run(&fs);
    assert_eq!(endpoints.len(), 1);
    assert_eq!(endpoints[0].auth_status, AuthStatus::Authenticated);
    assert_eq!(
        endpoints[0].effective_filters,
        vec!["authenticate_api_user!".to_string()]
    );
}

/// S4: ApplicationController requires auth for everything; PostsController
/// skips it for index/show and adds an unrelated before_action scoped to
/// show only. Only update keeps the inherited auth requirement.
#[test]
fn s4_skip_before_action_narrows_inherited_auth_to_one_action() {
    let fs = MemoryFs::new()
        .with_file(
            "config/routes.rb",
            "resources :posts, only: [:index, :show, :update]\n",
        )
        .with_file(
            "app/controllers/application_controller.rb",
            "class ApplicationController < ActionController::Base\n  before_action :authenticate_user!\nend\n",
        )
        .with_file(
            "app/controllers/posts_controller.rb",
            "class PostsController < ApplicationController\n  before_action :set_post, only: [:show]\n  skip_before_action :authenticate_user!, only: [:index, :show]\nend\n",
        );
    let (endpoints, _) = run(&fs);

    let index = endpoints.iter().find(|e| e.record.action == "index").unwrap();
    assert_eq!(index.auth_status, AuthStatus::Unprotected);

    let show = endpoints.iter().find(|e| e.record.action == "show").unwrap();
    assert_eq!(show.auth_status, AuthStatus::Unprotected);
    assert_eq!(show.effective_filters, vec!["set_post".to_string()]);

    let update = endpoints.iter().find(|e| e.record.action == "update").unwrap();
    assert_eq!(update.auth_status, AuthStatus::Authenticated);
    assert_eq!(update.effective_filters, vec!["authenticate_user!".to_string()]);
}

/// S5: an engine mount has no controller class to resolve against, so it's
/// reported unknown rather than guessed at.
#[test]
fn s5_engine_mount_is_unknown_auth_status() {
    let fs = MemoryFs::new().with_file(
        "config/routes.rb",
        "mount Sidekiq::Web => '/sidekiq'\n",
    );
    let (endpoints, _) = run(&fs);
    assert_eq!(endpoints.len(), 1);
    assert!(endpoints[0].record.has_flag(EndpointFlag::EngineMount));
    assert_eq!(endpoints[0].auth_status, AuthStatus::Unknown);
}

/// S6: a route declared inside an `if`/`else` is flagged conditional; the
/// flag alone is the pipeline's responsibility, independent of whether a
/// downstream consumer chooses to suppress it.
#[test]
fn s6_conditional_branch_routes_carry_the_conditional_flag() {
    let fs = MemoryFs::new().with_file(
        "config/routes.rb",
        "if Rails.env.production?\n  get '/live', to: 'status#live'\nelse\n  get '/dev', to: 'status#dev'\nend\n",
    );
    let (endpoints, _) = run(&fs);
    assert_eq!(endpoints.len(), 2);
    assert!(endpoints.iter().all(|e| e.record.has_flag(EndpointFlag::Conditional)));
}

/// Invariant 1: every resolved path is absolute, has no doubled slashes, and
/// carries no trailing slash (other than the bare root).
#[test]
fn invariant_paths_are_normalized() {
    let fs = MemoryFs::new().with_file(
        "config/routes.rb",
        "namespace :api do\n  scope path: '/v1/' do\n    get '/status/', to: 'status#show'\n  end\nend\n",
    );
    let (endpoints, _) = run(&fs);
    assert_eq!(endpoints.len(), 1);
    let path = &endpoints[0].record.path;
    assert!(path.starts_with('/'));
    assert!(!path.contains("//"));
    assert!(path == "/" || !path.ends_with('/'));
    assert_eq!(path, "/api/v1/status");
}

/// Invariant 2: `match ... via: :all` expands to every standard HTTP verb,
/// never an empty or partial set.
#[test]
fn invariant_via_all_covers_every_standard_verb() {
    let fs = MemoryFs::new().with_file(
        "config/routes.rb",
        "match '/webhook', to: 'hooks#receive', via: :all\n",
    );
    let (endpoints, _) = run(&fs);
    let verbs: std::collections::HashSet<_> = endpoints.iter().map(|e| e.record.verb).collect();
    assert_eq!(verbs.len(), Verb::all_standard().len());
}

/// Invariant 3: whenever an endpoint is classified authenticated, its
/// effective filter list contains at least one recognized auth filter.
#[test]
fn invariant_authenticated_implies_nonempty_auth_filter() {
    let fs = MemoryFs::new()
        .with_file(
            "config/routes.rb",
            "resources :posts, only: [:index]\n",
        )
        .with_file(
            "app/controllers/posts_controller.rb",
            "class PostsController < ApplicationController\n  before_action :authenticate_user!\nend\n",
        );
    let (endpoints, _) = run(&fs);
    let cfg = AnalyzerConfig::default();
    let re = regex::Regex::new(&cfg.auth_filter_pattern).unwrap();
    for e in &endpoints {
        if e.auth_status == AuthStatus::Authenticated {
            assert!(e
                .effective_filters
                .iter()
                .any(|f| cfg.auth_filter_names.iter().any(|n| n == f) || re.is_match(f)));
        }
    }
}

/// Invariant 5: analyzing the same tree twice produces byte-for-byte
/// identical output — no hidden iteration-order or nondeterministic state.
#[test]
fn invariant_analysis_is_deterministic_across_runs() {
    let fs = MemoryFs::new()
        .with_file(
            "config/routes.rb",
            "Rails.application.routes.draw do\n  namespace :admin do\n    resources :posts\n  end\n  resources :comments, only: [:index, :create]\n  mount Sidekiq::Web => '/sidekiq'\nend\n",
        )
        .with_file(
            "app/controllers/admin/posts_controller.rb",
            "module Admin\n  class PostsController < ApplicationController\n    before_action :authenticate_user!\n  end\nend\n",
        )
        .with_file(
            "app/controllers/comments_controller.rb",
            "class CommentsController < ApplicationController\nend\n",
        );

    let (first, first_diags) = run(&fs);
    let (second, second_diags) = run(&fs);
    assert_eq!(first, second);
    assert_eq!(first_diags.len(), second_diags.len());
}

/// Invariant 6: when both `only:` and `except:` are given, `except:` is
/// dropped (with a diagnostic) rather than silently combined, so the
/// resulting action set always matches `only:` exactly.
#[test]
fn invariant_only_and_except_together_keeps_exactly_only() {
    let fs = MemoryFs::new().with_file(
        "config/routes.rb",
        "resources :posts, only: [:index, :show], except: [:index]\n",
    );
    let (endpoints, diagnostics) = run(&fs);
    let actions: std::collections::BTreeSet<_> =
        endpoints.iter().map(|e| e.record.action.clone()).collect();
    assert_eq!(
        actions,
        ["index".to_string(), "show".to_string()].into_iter().collect()
    );
    assert!(diagnostics.iter().any(|d| d.message.contains("except: dropped")));
}

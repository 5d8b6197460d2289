//! End-to-end coverage of controller discovery: multi-file namespaced
//! classes, filter extraction, and strong-parameters schemas together.

use railguard_core::config::AnalyzerConfig;
use railguard_core::model::schema::TypeHint;
use railguard_core::vfs::MemoryFs;
use railguard_analysis::controller_analyzer::discover;

#[test]
fn discovers_every_controller_across_multiple_files() {
    let fs = MemoryFs::new()
        .with_file(
            "app/controllers/application_controller.rb",
            "class ApplicationController < ActionController::Base\nend\n",
        )
        .with_file(
            "app/controllers/posts_controller.rb",
            "class PostsController < ApplicationController\n  before_action :authenticate_user!, only: [:create, :update, :destroy]\nend\n",
        )
        .with_file(
            "app/controllers/admin/dashboard_controller.rb",
            "module Admin\n  class DashboardController < Admin::BaseController\n  end\nend\n",
        );
    let (classes, diagnostics) = discover(&fs, &AnalyzerConfig::default());
    assert!(diagnostics.is_empty());
    assert_eq!(classes.len(), 3);
    assert!(classes.contains_key("ApplicationController"));
    assert!(classes.contains_key("PostsController"));
    assert!(classes.contains_key("Admin::DashboardController"));
    assert_eq!(
        classes["Admin::DashboardController"].parent_class.as_deref(),
        Some("Admin::BaseController")
    );
}

#[test]
fn before_action_and_skip_before_action_both_extracted() {
    let fs = MemoryFs::new().with_file(
        "app/controllers/posts_controller.rb",
        "class PostsController < ApplicationController\n  before_action :authenticate_user!\n  skip_before_action :authenticate_user!, only: [:index, :show]\nend\n",
    );
    let (classes, _) = discover(&fs, &AnalyzerConfig::default());
    let posts = &classes["PostsController"];
    assert_eq!(posts.before_actions.len(), 1);
    assert_eq!(posts.before_actions[0].filter_name, "authenticate_user!");
    assert_eq!(posts.skip_before_actions.len(), 1);
    assert_eq!(
        posts.skip_before_actions[0].only,
        Some(["index".to_string(), "show".to_string()].into())
    );
}

#[test]
fn before_filter_and_before_action_aliases_both_recognized() {
    let fs = MemoryFs::new().with_file(
        "app/controllers/legacy_controller.rb",
        "class LegacyController < ApplicationController\n  before_filter :require_login\nend\n",
    );
    let (classes, _) = discover(&fs, &AnalyzerConfig::default());
    assert_eq!(classes["LegacyController"].before_actions[0].filter_name, "require_login");
}

#[test]
fn block_filter_with_no_names_becomes_the_synthetic_block_marker() {
    let fs = MemoryFs::new().with_file(
        "app/controllers/posts_controller.rb",
        "class PostsController < ApplicationController\n  before_action do\n    check_something\n  end\nend\n",
    );
    let (classes, _) = discover(&fs, &AnalyzerConfig::default());
    let decl = &classes["PostsController"].before_actions[0];
    assert!(decl.is_block());
}

#[test]
fn only_and_except_together_drops_except_with_diagnostic() {
    let fs = MemoryFs::new().with_file(
        "app/controllers/posts_controller.rb",
        "class PostsController < ApplicationController\n  before_action :authenticate_user!, only: [:show], except: [:index]\nend\n",
    );
    let (classes, diagnostics) = discover(&fs, &AnalyzerConfig::default());
    let decl = &classes["PostsController"].before_actions[0];
    assert!(decl.only.is_some());
    assert!(decl.except.is_none());
    assert!(diagnostics.iter().any(|d| d.message.contains("except: dropped")));
}

#[test]
fn strong_params_schema_extracted_with_type_hints() {
    let fs = MemoryFs::new().with_file(
        "app/controllers/posts_controller.rb",
        "class PostsController < ApplicationController\n  def post_params\n    params.require(:post).permit(:title, :author_id, :is_published)\n  end\nend\n",
    );
    let (classes, _) = discover(&fs, &AnalyzerConfig::default());
    let schema = classes["PostsController"].action_params.get("post").expect("schema for post action");
    assert_eq!(schema.root_key.as_deref(), Some("post"));
    assert!(schema.fields.contains(&("title".to_string(), TypeHint::String)));
    assert!(schema.fields.contains(&("author_id".to_string(), TypeHint::Integer)));
    assert!(schema.fields.contains(&("is_published".to_string(), TypeHint::Boolean)));
}

#[test]
fn action_params_keyed_by_stripped_action_name() {
    let fs = MemoryFs::new().with_file(
        "app/controllers/users_controller.rb",
        "class UsersController < ApplicationController\n  def user_params\n    params.require(:user).permit(:email)\n  end\nend\n",
    );
    let (classes, _) = discover(&fs, &AnalyzerConfig::default());
    assert!(classes["UsersController"].action_params.contains_key("user"));
}

#[test]
fn unreadable_listed_file_produces_a_warn_diagnostic_not_a_panic() {
    // MemoryFs always returns what's inserted, so this exercises the
    // well-formed path; the unreadable branch is defensive and only ever
    // triggers for a real VirtualFs racing with its own listing.
    let fs = MemoryFs::new();
    let (classes, diagnostics) = discover(&fs, &AnalyzerConfig::default());
    assert!(classes.is_empty());
    assert!(diagnostics.is_empty());
}
